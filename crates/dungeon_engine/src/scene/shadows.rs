//! Shadow-map generator settings

/// Filtering applied to the shadow map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowFilter {
    /// Hard shadows
    None,
    /// Variance shadow map
    Variance,
    /// Variance shadow map with a blur pass
    BlurVariance,
}

/// Shadow-map generator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowMapSettings {
    /// Shadow map resolution in texels (square)
    pub resolution: u32,
    /// Filtering mode
    pub filter: ShadowFilter,
}

impl ShadowMapSettings {
    /// Create settings with the given resolution and no filtering
    pub fn new(resolution: u32) -> Self {
        Self { resolution, filter: ShadowFilter::None }
    }

    /// Set filtering mode
    pub fn with_filter(mut self, filter: ShadowFilter) -> Self {
        self.filter = filter;
        self
    }
}
