//! Mapping between simulation handles and small wire ids.

use std::collections::HashMap;

use skylane_sim::ObjectId;

use crate::protocol::WireId;

/// Bidirectional object/wire-id table. Ids are handed out in increasing
/// order and never reused until [`IdMap::clear`].
#[derive(Debug, Default)]
pub struct IdMap {
    next_id: WireId,
    wire_ids: HashMap<ObjectId, WireId>,
    objects: HashMap<WireId, ObjectId>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id of `object`, assigning the next free one on first sight.
    pub fn assign(&mut self, object: ObjectId) -> WireId {
        if let Some(&id) = self.wire_ids.get(&object) {
            return id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.bind(id, object);
        id
    }

    /// Record an id chosen by the other side.
    pub fn bind(&mut self, id: WireId, object: ObjectId) {
        if let Some(previous) = self.objects.insert(id, object) {
            self.wire_ids.remove(&previous);
        }
        self.wire_ids.insert(object, id);
    }

    pub fn wire_id(&self, object: ObjectId) -> Option<WireId> {
        self.wire_ids.get(&object).copied()
    }

    pub fn object(&self, id: WireId) -> Option<ObjectId> {
        self.objects.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.next_id = 0;
        self.wire_ids.clear();
        self.objects.clear();
    }
}
