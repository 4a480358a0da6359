// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Tunable settings for the rendering pipeline.
//!
//! Shadow bias and filtering parameters are configuration inputs with
//! documented defaults rather than hard-coded constants; editors can
//! round-trip the whole struct through RON.

use serde::{Deserialize, Serialize};

/// Settings for the cascaded (directional) shadow maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowSettings {
    /// The number of cascades in use, at most
    /// [`SHADOW_CASCADES`](crate::cascade::SHADOW_CASCADES).
    pub cascade_count: u32,
    /// The square shadow-map resolution per cascade.
    pub map_size: u32,
    /// Blend factor between logarithmic (1.0) and uniform (0.0) cascade
    /// split distribution. Clamped into `[0, 1]`.
    pub split_lambda: f32,
    /// Constant depth bias applied when sampling the shadow map.
    /// Sensible values sit in roughly `[0.00001, 0.5]`.
    pub bias: f32,
    /// Apparent light size used by the softening filter, in world units.
    pub light_size: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            cascade_count: 4,
            map_size: 4096,
            split_lambda: 0.95,
            bias: 0.0005,
            light_size: 0.1,
        }
    }
}

/// Settings for the omni-directional (point light) shadow map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OmniShadowSettings {
    /// The square resolution of each cube face.
    pub map_size: u32,
}

impl Default for OmniShadowSettings {
    fn default() -> Self {
        Self { map_size: 1024 }
    }
}

/// Settings for the deferred lighting pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingSettings {
    /// Tint the output by cascade index for debugging.
    pub color_cascades: bool,
    /// Force a single cascade for the whole view when set.
    pub display_cascade: Option<u32>,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            color_cascades: false,
            display_cascade: None,
        }
    }
}

/// The full configuration of the rendering pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Cascaded shadow settings.
    pub shadow: ShadowSettings,
    /// Omni shadow settings.
    pub omni_shadow: OmniShadowSettings,
    /// Lighting settings.
    pub lighting: LightingSettings,
}

impl RenderConfig {
    /// Parses a configuration from RON text.
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Serializes the configuration to RON text.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = RenderConfig::default();
        assert_eq!(config.shadow.cascade_count, 4);
        assert_eq!(config.shadow.map_size, 4096);
        assert_eq!(config.shadow.split_lambda, 0.95);
        assert_eq!(config.shadow.bias, 0.0005);
    }

    #[test]
    fn ron_round_trip() {
        let config = RenderConfig {
            shadow: ShadowSettings {
                cascade_count: 3,
                map_size: 2048,
                ..Default::default()
            },
            ..Default::default()
        };
        let text = config.to_ron().unwrap();
        let parsed = RenderConfig::from_ron(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
