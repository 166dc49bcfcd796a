//! Platform abstraction layer
//!
//! The engine never asks the DOM anything directly. It sees the arena's
//! rendering surface through [`SurfaceProbe`], which reports the current
//! laid-out size (or nothing while layout has not happened yet).

use crate::consts::MIN_SURFACE_EXTENT;

/// Source of the arena surface size
pub trait SurfaceProbe {
    /// Current size in arena units, `None` if the surface does not exist yet
    fn size(&self) -> Option<(f32, f32)>;

    /// True once both sides reach the minimum extent
    fn is_laid_out(&self) -> bool {
        self.size()
            .is_some_and(|(w, h)| w >= MIN_SURFACE_EXTENT && h >= MIN_SURFACE_EXTENT)
    }
}

/// Surface with a size the host sets directly (native runs, tests)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedSurface {
    pub width: f32,
    pub height: f32,
}

impl FixedSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl SurfaceProbe for FixedSurface {
    fn size(&self) -> Option<(f32, f32)> {
        Some((self.width, self.height))
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::ElementSurface;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::SurfaceProbe;

    /// DOM element looked up by id on every probe, so a late mount is picked up
    #[derive(Debug, Clone)]
    pub struct ElementSurface {
        pub element_id: String,
    }

    impl ElementSurface {
        pub fn new(element_id: impl Into<String>) -> Self {
            Self {
                element_id: element_id.into(),
            }
        }
    }

    impl SurfaceProbe for ElementSurface {
        fn size(&self) -> Option<(f32, f32)> {
            let element = web_sys::window()?
                .document()?
                .get_element_by_id(&self.element_id)?;
            Some((element.client_width() as f32, element.client_height() as f32))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unmounted;

    impl SurfaceProbe for Unmounted {
        fn size(&self) -> Option<(f32, f32)> {
            None
        }
    }

    #[test]
    fn test_threshold_applies_to_both_sides() {
        assert!(FixedSurface::new(100.0, 100.0).is_laid_out());
        assert!(!FixedSurface::new(640.0, 99.0).is_laid_out());
        assert!(!FixedSurface::default().is_laid_out());
        assert!(!Unmounted.is_laid_out());
    }
}
