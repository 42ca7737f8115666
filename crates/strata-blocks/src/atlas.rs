use std::collections::HashMap;
use std::error::Error;

/// Tiles per atlas row.
pub const ATLAS_WIDTH: u8 = 16;

/// Largest corner offset a vertex adds to its tile index.
pub const MAX_CORNER_OFFSET: u8 = ATLAS_WIDTH + 1;

/// Maps texture names to tile indices in the stitched atlas image.
#[derive(Default, Clone, Debug)]
pub struct TextureAtlas {
    pub names: Vec<String>,
    pub by_name: HashMap<String, u8>,
}

impl TextureAtlas {
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Builds the atlas from every referenced texture name. Names are sorted so
    /// tile assignment matches the stitching order and stays stable across runs.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self, Box<dyn Error>> {
        let mut sorted: Vec<&str> = names.into_iter().collect();
        sorted.sort_unstable();
        sorted.dedup();
        let max_tiles = usize::from(u8::MAX - MAX_CORNER_OFFSET) + 1;
        if sorted.len() > max_tiles {
            return Err(format!(
                "{} textures do not fit the 8-bit texture field (max {max_tiles})",
                sorted.len()
            )
            .into());
        }
        let mut atlas = TextureAtlas::new();
        for (i, name) in sorted.into_iter().enumerate() {
            atlas.by_name.insert(name.to_string(), i as u8);
            atlas.names.push(name.to_string());
        }
        Ok(atlas)
    }

    #[inline]
    pub fn tile(&self, name: &str) -> Option<u8> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_follow_sorted_names() {
        let atlas = TextureAtlas::from_names(["stone", "dirt", "grass_top", "dirt"]).unwrap();
        assert_eq!(atlas.len(), 3);
        assert_eq!(atlas.tile("dirt"), Some(0));
        assert_eq!(atlas.tile("grass_top"), Some(1));
        assert_eq!(atlas.tile("stone"), Some(2));
        assert_eq!(atlas.tile("glass"), None);
    }

    #[test]
    fn rejects_overflowing_atlas() {
        let names: Vec<String> = (0..300).map(|i| format!("t{i:03}")).collect();
        let err = TextureAtlas::from_names(names.iter().map(String::as_str));
        assert!(err.is_err());
    }
}
