use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::atlas::TextureAtlas;
use super::config::{BlockDef, BlocksConfig};
use super::types::{AIR, BlockId, FULL_HEIGHT, FaceSlot};

const BUILTIN_BLOCKS: &str = include_str!("../assets/blocks.toml");

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    /// Sub-voxel top level in `0..=15`.
    pub height: u8,
    pub transparent: bool,
    pub liquid: bool,
    pub viscosity: f32,
    /// Atlas tile per face, indexed by [`FaceSlot::index`].
    pub tiles: [u8; 6],
}

impl BlockType {
    #[inline]
    pub fn tile(&self, face: FaceSlot) -> u8 {
        self.tiles[face.index()]
    }
}

/// Immutable block table shared by world generation and meshing.
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    pub atlas: TextureAtlas,
    pub blocks: Vec<Option<BlockType>>,
    pub by_name: HashMap<String, BlockId>,
}

impl BlockRegistry {
    /// Stock block set: air, grass, glass, water, sand, dirt, stone.
    pub fn builtin() -> Result<Self, Box<dyn Error>> {
        Self::from_toml_str(BUILTIN_BLOCKS)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(s)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut referenced = Vec::new();
        for def in &cfg.blocks {
            for face in FaceSlot::ALL {
                match def.textures.for_face(face) {
                    Some(name) => referenced.push(name),
                    None => {
                        return Err(format!("block '{}' has no texture for {face:?}", def.name).into());
                    }
                }
            }
        }
        let atlas = TextureAtlas::from_names(referenced)?;

        let mut blocks: Vec<Option<BlockType>> = vec![None; usize::from(u8::MAX) + 1];
        let mut by_name = HashMap::new();
        by_name.insert("air".to_string(), AIR);
        for def in &cfg.blocks {
            let ty = compile_block(def, &atlas)?;
            if by_name.contains_key(&ty.name) {
                return Err(format!("duplicate block name '{}'", ty.name).into());
            }
            let slot = &mut blocks[usize::from(ty.id)];
            if slot.is_some() {
                return Err(format!("duplicate block id {}", ty.id).into());
            }
            by_name.insert(ty.name.clone(), ty.id);
            *slot = Some(ty);
        }
        Ok(BlockRegistry {
            atlas,
            blocks,
            by_name,
        })
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks[usize::from(id)].as_ref()
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn is_transparent(&self, id: BlockId) -> bool {
        self.get(id).is_some_and(|t| t.transparent)
    }

    /// Height level of `id`; air reports 0, unknown ids report a full block.
    #[inline]
    pub fn height(&self, id: BlockId) -> u8 {
        if id == AIR {
            return 0;
        }
        self.get(id).map_or(FULL_HEIGHT, |t| t.height)
    }

    /// Whether a face of `back` is visible through the neighboring block `front`.
    #[inline]
    pub fn shows_through(&self, front: BlockId, back: BlockId) -> bool {
        front == AIR || (self.is_transparent(front) && front != back)
    }

    /// Number of registered non-air block types.
    pub fn len(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn compile_block(def: &BlockDef, atlas: &TextureAtlas) -> Result<BlockType, Box<dyn Error>> {
    if def.id == AIR {
        return Err(format!("block '{}' uses id 0, which is reserved for air", def.name).into());
    }
    if def.name == "air" {
        return Err("block name 'air' is reserved".into());
    }
    if def.height > FULL_HEIGHT {
        return Err(format!(
            "block '{}' has height {} outside 0..={FULL_HEIGHT}",
            def.name, def.height
        )
        .into());
    }
    let mut tiles = [0u8; 6];
    for face in FaceSlot::ALL {
        let name = def
            .textures
            .for_face(face)
            .ok_or_else(|| format!("block '{}' has no texture for {face:?}", def.name))?;
        tiles[face.index()] = atlas
            .tile(name)
            .ok_or_else(|| format!("texture '{name}' missing from atlas"))?;
    }
    Ok(BlockType {
        id: def.id,
        name: def.name.clone(),
        height: def.height,
        transparent: def.transparent,
        liquid: def.liquid,
        viscosity: def.viscosity,
        tiles,
    })
}
