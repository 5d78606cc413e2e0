//! Edit parameters: one filter plus five slider adjustments.
//!
//! `EditParams` describes an entire look. Hosts that keep slider state can
//! send it whole (e.g. as JSON) instead of sequencing individual calls.

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::color::{Adjustment, Filter};
use crate::error::Result;

/// Slider values. `0` is neutral for every field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    pub brightness: i32,
    pub contrast: i32,
    pub saturation: i32,
    pub highlights: i32,
    pub shadows: i32,
}

impl Adjustments {
    pub fn get(&self, adjustment: Adjustment) -> i32 {
        match adjustment {
            Adjustment::Brightness => self.brightness,
            Adjustment::Contrast => self.contrast,
            Adjustment::Saturation => self.saturation,
            Adjustment::Highlights => self.highlights,
            Adjustment::Shadows => self.shadows,
        }
    }

    /// Set one slider, rejecting values outside its domain.
    pub fn set(&mut self, adjustment: Adjustment, value: i32) -> Result<()> {
        adjustment.validate(value)?;
        let slot = match adjustment {
            Adjustment::Brightness => &mut self.brightness,
            Adjustment::Contrast => &mut self.contrast,
            Adjustment::Saturation => &mut self.saturation,
            Adjustment::Highlights => &mut self.highlights,
            Adjustment::Shadows => &mut self.shadows,
        };
        *slot = value;
        Ok(())
    }

    /// `(adjustment, value)` pairs in application order.
    pub fn iter(&self) -> impl Iterator<Item = (Adjustment, i32)> + '_ {
        Adjustment::all().iter().map(|&a| (a, self.get(a)))
    }

    pub fn is_neutral(&self) -> bool {
        self.iter().all(|(_, v)| v == 0)
    }

    pub fn validate(&self) -> Result<()> {
        self.iter().try_for_each(|(a, v)| a.validate(v))
    }
}

/// A complete edit: an optional filter followed by the adjustments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditParams {
    pub filter: Option<Filter>,
    pub adjustments: Adjustments,
}

impl EditParams {
    /// Whether applying these parameters changes nothing.
    pub fn is_identity(&self) -> bool {
        self.filter.is_none() && self.adjustments.is_neutral()
    }
}

/// Apply `params` to `buffer`: the filter first, then every non-zero
/// adjustment in [`Adjustment::all`] order.
///
/// All values are validated before the first pixel changes.
pub fn apply_edit(buffer: &mut PixelBuffer, params: &EditParams) -> Result<()> {
    params.adjustments.validate()?;
    if let Some(filter) = params.filter {
        filter.apply(buffer);
    }
    for (adjustment, value) in params.adjustments.iter().filter(|&(_, v)| v != 0) {
        adjustment.apply(buffer, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{adjustments, filters};
    use crate::error::PixelError;

    fn sample() -> PixelBuffer {
        PixelBuffer::from_raw(
            2,
            2,
            vec![
                10, 20, 30, 255, 200, 150, 100, 128, //
                250, 240, 230, 64, 5, 60, 120, 0,
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_default_is_identity() {
        let params = EditParams::default();
        assert!(params.is_identity());
        let mut buf = sample();
        apply_edit(&mut buf, &params).unwrap();
        assert_eq!(buf, sample());
    }

    #[test]
    fn test_apply_matches_manual_sequence() {
        let params = EditParams {
            filter: Some(Filter::Vivid),
            adjustments: Adjustments {
                brightness: -10,
                saturation: 30,
                shadows: 40,
                ..Adjustments::default()
            },
        };

        let mut expected = sample();
        filters::vivid(&mut expected);
        adjustments::brightness(&mut expected, -10).unwrap();
        adjustments::saturation(&mut expected, 30).unwrap();
        adjustments::shadows(&mut expected, 40).unwrap();

        let mut buf = sample();
        apply_edit(&mut buf, &params).unwrap();
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_invalid_value_leaves_buffer_untouched() {
        let params = EditParams {
            filter: Some(Filter::Monochrome),
            adjustments: Adjustments {
                contrast: 259,
                ..Adjustments::default()
            },
        };
        let mut buf = sample();
        assert!(matches!(
            apply_edit(&mut buf, &params),
            Err(PixelError::InvalidParameter { .. })
        ));
        assert_eq!(buf, sample());
    }

    #[test]
    fn test_set_rejects_out_of_domain() {
        let mut adj = Adjustments::default();
        adj.set(Adjustment::Highlights, 40).unwrap();
        assert!(adj.set(Adjustment::Highlights, 140).is_err());
        assert_eq!(adj.highlights, 40);
        assert!(!adj.is_neutral());
    }

    #[test]
    fn test_params_from_partial_json() {
        let params: EditParams =
            serde_json::from_str(r#"{"filter":"bnw","adjustments":{"contrast":20}}"#).unwrap();
        assert_eq!(params.filter, Some(Filter::BlackAndWhite));
        assert_eq!(params.adjustments.contrast, 20);
        assert_eq!(params.adjustments.brightness, 0);

        let empty: EditParams = serde_json::from_str("{}").unwrap();
        assert!(empty.is_identity());
    }
}
