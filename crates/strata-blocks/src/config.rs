use serde::Deserialize;

use crate::types::FaceSlot;

#[derive(Deserialize, Clone, Debug, Default)]
pub struct BlocksConfig {
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct BlockDef {
    pub name: String,
    pub id: u8,
    #[serde(default = "default_height")]
    pub height: u8,
    #[serde(default)]
    pub transparent: bool,
    #[serde(default)]
    pub liquid: bool,
    #[serde(default = "default_viscosity")]
    pub viscosity: f32,
    #[serde(default)]
    pub textures: TexturesDef,
}

fn default_height() -> u8 {
    15
}

fn default_viscosity() -> f32 {
    1.0
}

/// Texture names for a block. Per-face entries win over `side`/`top`/`bottom`,
/// which win over `all`.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct TexturesDef {
    pub all: Option<String>,
    pub top: Option<String>,
    pub bottom: Option<String>,
    pub side: Option<String>,
    pub left: Option<String>,
    pub right: Option<String>,
    pub front: Option<String>,
    pub back: Option<String>,
}

impl TexturesDef {
    pub fn for_face(&self, face: FaceSlot) -> Option<&str> {
        let exact = match face {
            FaceSlot::Top => self.top.as_ref(),
            FaceSlot::Bottom => self.bottom.as_ref(),
            FaceSlot::Left => self.left.as_ref().or(self.side.as_ref()),
            FaceSlot::Right => self.right.as_ref().or(self.side.as_ref()),
            FaceSlot::Front => self.front.as_ref().or(self.side.as_ref()),
            FaceSlot::Back => self.back.as_ref().or(self.side.as_ref()),
        };
        exact.or(self.all.as_ref()).map(String::as_str)
    }

    /// Every texture name this definition references.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        [
            &self.all,
            &self.top,
            &self.bottom,
            &self.side,
            &self.left,
            &self.right,
            &self.front,
            &self.back,
        ]
        .into_iter()
        .filter_map(|n| n.as_deref())
    }
}
