//! Non-destructive edit session over a single image.
//!
//! The session keeps the pristine source next to the rendered working copy.
//! Every parameter change re-renders from the source, so adjustments never
//! compound and can be undone by setting them back to zero.

use crate::buffer::PixelBuffer;
use crate::color::{Adjustment, Filter};
use crate::edit::params::{EditParams, apply_edit};
use crate::error::Result;
use crate::geometry::{CropRegion, CropShape, crop, scale};

#[derive(Debug, Clone)]
pub struct EditSession {
    source: PixelBuffer,
    current: PixelBuffer,
    params: EditParams,
}

impl EditSession {
    pub fn new(source: PixelBuffer) -> Self {
        Self {
            current: source.clone(),
            source,
            params: EditParams::default(),
        }
    }

    /// The unedited image (after any committed crop).
    pub fn source(&self) -> &PixelBuffer {
        &self.source
    }

    /// The rendered image.
    pub fn current(&self) -> &PixelBuffer {
        &self.current
    }

    pub fn params(&self) -> &EditParams {
        &self.params
    }

    pub fn into_current(self) -> PixelBuffer {
        self.current
    }

    /// Select `filter`, or clear it if it is already selected.
    pub fn toggle_filter(&mut self, filter: Filter) -> Result<()> {
        self.params.filter = if self.params.filter == Some(filter) {
            None
        } else {
            Some(filter)
        };
        self.render()
    }

    pub fn set_adjustment(&mut self, adjustment: Adjustment, value: i32) -> Result<()> {
        self.params.adjustments.set(adjustment, value)?;
        self.render()
    }

    /// Replace all parameters at once. Invalid parameters are rejected and the
    /// session is left unchanged.
    pub fn set_params(&mut self, params: EditParams) -> Result<()> {
        params.adjustments.validate()?;
        self.params = params;
        self.render()
    }

    /// Rebuild the working copy from the source and the current parameters.
    pub fn render(&mut self) -> Result<()> {
        self.current.clone_from(&self.source);
        apply_edit(&mut self.current, &self.params)
    }

    /// Drop every filter and adjustment.
    pub fn reset(&mut self) {
        self.params = EditParams::default();
        self.current.clone_from(&self.source);
    }

    /// Crop the source and re-render. Returns the new dimensions.
    ///
    /// The crop applies to the unedited source, so the active filter and
    /// adjustments stay editable afterwards.
    pub fn crop(&mut self, region: CropRegion, shape: CropShape) -> Result<(u32, u32)> {
        let dims = crop(&mut self.source, region, shape)?;
        self.render()?;
        Ok(dims)
    }

    /// A resampled copy of the rendered image.
    pub fn export(&self, factor: f32) -> Result<PixelBuffer> {
        scale(&self.current, factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::filters;

    fn source() -> PixelBuffer {
        let mut data = Vec::new();
        for i in 0..16u8 {
            data.extend_from_slice(&[i * 15, 255 - i * 10, i * 7, 200]);
        }
        PixelBuffer::from_raw(4, 4, data).unwrap()
    }

    #[test]
    fn test_toggle_filter_twice_restores_source() {
        let mut session = EditSession::new(source());
        session.toggle_filter(Filter::Monochrome).unwrap();
        assert_eq!(session.params().filter, Some(Filter::Monochrome));
        assert_ne!(session.current(), session.source());

        session.toggle_filter(Filter::Monochrome).unwrap();
        assert_eq!(session.params().filter, None);
        assert_eq!(session.current(), &source());
    }

    #[test]
    fn test_switching_filter_does_not_compound() {
        let mut session = EditSession::new(source());
        session.toggle_filter(Filter::Bright).unwrap();
        session.toggle_filter(Filter::Vivid).unwrap();

        let mut expected = source();
        filters::vivid(&mut expected);
        assert_eq!(session.current(), &expected);
    }

    #[test]
    fn test_adjustments_render_from_source() {
        let mut session = EditSession::new(source());
        session.set_adjustment(Adjustment::Brightness, 80).unwrap();
        session.set_adjustment(Adjustment::Brightness, 0).unwrap();
        assert_eq!(session.current(), &source());
    }

    #[test]
    fn test_invalid_adjustment_keeps_state() {
        let mut session = EditSession::new(source());
        session.set_adjustment(Adjustment::Shadows, 30).unwrap();
        let rendered = session.current().clone();
        assert!(session.set_adjustment(Adjustment::Shadows, 300).is_err());
        assert_eq!(session.params().adjustments.shadows, 30);
        assert_eq!(session.current(), &rendered);
    }

    #[test]
    fn test_reset() {
        let mut session = EditSession::new(source());
        session.toggle_filter(Filter::BlackAndWhite).unwrap();
        session.set_adjustment(Adjustment::Contrast, 40).unwrap();
        session.reset();
        assert!(session.params().is_identity());
        assert_eq!(session.current(), &source());
    }

    #[test]
    fn test_crop_keeps_filter_editable() {
        let mut session = EditSession::new(source());
        session.toggle_filter(Filter::Vivid).unwrap();
        let dims = session
            .crop(CropRegion::new(1, 1, 2, 2), CropShape::Square)
            .unwrap();
        assert_eq!(dims, (2, 2));
        assert_eq!(session.source().dimensions(), (2, 2));
        assert_eq!(session.current().dimensions(), (2, 2));

        // Clearing the filter reveals the untouched cropped source.
        session.toggle_filter(Filter::Vivid).unwrap();
        assert_eq!(session.current().pixel(0, 0), source().pixel(1, 1));
    }

    #[test]
    fn test_export_scales_rendered_image() {
        let mut session = EditSession::new(source());
        session.toggle_filter(Filter::Monochrome).unwrap();
        let exported = session.export(0.5).unwrap();
        assert_eq!(exported.dimensions(), (2, 2));
        assert_eq!(exported.pixel(0, 0), session.current().pixel(0, 0));
    }
}
