//! Named surface materials and the pairwise contact parameter table.

use std::collections::HashMap;

/// Handle to a registered surface material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// Friction and restitution governing how two surfaces respond on contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactParams {
    pub friction: f32,
    pub restitution: f32,
}

impl ContactParams {
    pub fn new(friction: f32, restitution: f32) -> Self {
        ContactParams { friction, restitution }
    }
}

impl Default for ContactParams {
    fn default() -> Self {
        ContactParams { friction: 0.3, restitution: 0.0 }
    }
}

/// Registered materials plus the pairing table the solver consults.
///
/// Pairs are stored under an ordered key, so `(a, b)` and `(b, a)` resolve
/// to the same parameters. Contacts with a missing material on either side,
/// or with an unregistered pairing, fall back to the table default.
#[derive(Debug, Clone)]
pub struct ContactMaterialTable {
    names: Vec<String>,
    pairs: HashMap<(MaterialId, MaterialId), ContactParams>,
    default: ContactParams,
}

impl ContactMaterialTable {
    pub fn new() -> Self {
        ContactMaterialTable {
            names: Vec::new(),
            pairs: HashMap::new(),
            default: ContactParams::default(),
        }
    }

    /// Register a material under `name` and return its handle.
    pub fn register_material(&mut self, name: &str) -> MaterialId {
        let id = MaterialId(self.names.len() as u32);
        self.names.push(name.to_string());
        id
    }

    pub fn material_name(&self, id: MaterialId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    /// Set the parameters used when two materials meet.
    pub fn add_pair(&mut self, a: MaterialId, b: MaterialId, params: ContactParams) {
        self.pairs.insert(Self::pair_key(a, b), params);
    }

    /// Set the fallback used when no pairing matches.
    pub fn set_default(&mut self, params: ContactParams) {
        self.default = params;
    }

    pub fn default_params(&self) -> ContactParams {
        self.default
    }

    pub fn lookup(&self, a: Option<MaterialId>, b: Option<MaterialId>) -> ContactParams {
        match (a, b) {
            (Some(a), Some(b)) => self
                .pairs
                .get(&Self::pair_key(a, b))
                .copied()
                .unwrap_or(self.default),
            _ => self.default,
        }
    }

    fn pair_key(a: MaterialId, b: MaterialId) -> (MaterialId, MaterialId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

impl Default for ContactMaterialTable {
    fn default() -> Self {
        Self::new()
    }
}
