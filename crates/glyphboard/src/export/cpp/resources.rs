//! Shared freehand art resources.
//!
//! Art is stored once in program memory no matter how many elements show
//! it. Elements are matched by [`ResourceKey`], so two pieces of art share a
//! resource exactly when their lines are identical.

use std::collections::HashMap;

use log::debug;

use glyphboard_core::{
    conventions::Conventions,
    element::{Freehand, ResourceKey, Shape},
};

use crate::structure::ProjectLayout;

/// One emitted resource: its base name and art lines.
#[derive(Debug)]
pub struct Resource<'a> {
    base: String,
    lines: &'a [String],
}

impl<'a> Resource<'a> {
    /// `RES_<ordinal>_<identifier>`.
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn lines(&self) -> &'a [String] {
        self.lines
    }
}

/// All resources of a project in order of first appearance.
#[derive(Debug, Default)]
pub struct ResourcePool<'a> {
    resources: Vec<Resource<'a>>,
    by_key: HashMap<ResourceKey, usize>,
}

impl<'a> ResourcePool<'a> {
    /// Collects the freehand art of every screen, in screen and source order.
    ///
    /// The first element showing a piece of art names its resource; the
    /// ordinal keeps names distinct even when identifiers repeat across
    /// screens.
    pub fn collect(layout: &ProjectLayout<'a>, conventions: &Conventions) -> Self {
        let mut pool = Self::default();
        for screen in layout.screens() {
            for entry in screen.entries() {
                if let Shape::Freehand(art) = entry.element().shape() {
                    pool.insert(art, entry.identifier(), conventions);
                }
            }
        }
        debug!(resources = pool.resources.len(); "Resource pool collected");
        pool
    }

    fn insert(&mut self, art: &'a Freehand, identifier: &str, conventions: &Conventions) {
        let key = art.resource_key();
        if self.by_key.contains_key(&key) {
            return;
        }
        let ordinal = self.resources.len();
        self.by_key.insert(key, ordinal);
        self.resources.push(Resource {
            base: conventions.resource_base(ordinal, identifier),
            lines: art.content(),
        });
    }

    pub fn resources(&self) -> &[Resource<'a>] {
        &self.resources
    }

    /// The resource holding `art`, if it was collected.
    pub fn get(&self, art: &Freehand) -> Option<&Resource<'a>> {
        self.by_key
            .get(&art.resource_key())
            .map(|&index| &self.resources[index])
    }
}
