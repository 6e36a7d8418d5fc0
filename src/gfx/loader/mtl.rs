//! MTL material library parser.
//!
//! Supported directives: `newmtl`, `Ka`, `Kd`, `Ks`, `d`, `Tr`, `Ns`.
//! Anything else (texture maps, illumination models, comments) is skipped.

use std::collections::HashMap;

use crate::{
    error::{Error, Result},
    gfx::scene::Material,
};

use super::{next_token, parse_floats};

/// Materials in declaration order plus a name → index map.
///
/// Redeclaring a name appends a new material and re-points the name at it;
/// the earlier record stays in the list.
#[derive(Debug, Clone, Default)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
    indices: HashMap<String, usize>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Material> {
        self.indices.get(name).map(|&index| &self.materials[index])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    fn declare(&mut self, name: &str) -> usize {
        let index = self.materials.len();
        self.materials.push(Material::default());
        self.indices.insert(name.to_owned(), index);
        index
    }

    fn current_mut(&mut self, line: usize) -> Result<&mut Material> {
        self.materials.last_mut().ok_or(Error::State {
            line,
            message: "no current material",
        })
    }
}

/// Parses MTL text into `library`.
///
/// Property lines apply to the most recently declared material; a property
/// before any `newmtl` fails with [`Error::State`].
pub fn parse_mtl(text: &str, library: &mut MaterialLibrary) -> Result<()> {
    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let mut tokens = line.split_whitespace();
        let Some(directive) = tokens.next() else {
            continue;
        };

        match directive {
            "newmtl" => {
                // Single token, the same rule `usemtl` uses to look it up
                let name = next_token(&mut tokens, line_number, "material name")?;
                library.declare(name);
            }
            "Ka" => {
                let material = library.current_mut(line_number)?;
                material.ambient_color = parse_floats(&mut tokens, line_number, "ambient color")?;
            }
            "Kd" => {
                let material = library.current_mut(line_number)?;
                material.diffuse_color = parse_floats(&mut tokens, line_number, "diffuse color")?;
            }
            "Ks" => {
                let material = library.current_mut(line_number)?;
                material.specular_color =
                    parse_floats(&mut tokens, line_number, "specular color")?;
            }
            "d" | "Tr" => {
                let material = library.current_mut(line_number)?;
                let [transparency] = parse_floats(&mut tokens, line_number, "transparency")?;
                material.transparency = transparency;
            }
            "Ns" => {
                let material = library.current_mut(line_number)?;
                let [shininess] = parse_floats(&mut tokens, line_number, "shininess")?;
                material.shininess = shininess;
            }
            _ => {}
        }
    }

    log::debug!("parsed {} materials", library.len());
    Ok(())
}
