//! Handle to entity lookup

use indexmap::IndexMap;

use crate::entities::DxfEntity;
use crate::error::{DxfError, Result};
use crate::notification::{NotificationCollection, NotificationType};
use crate::types::Handle;

/// Resolves handle references between entities
pub trait EntityResolver {
    fn resolve(&self, handle: Handle) -> Option<&DxfEntity>;

    /// Entity owning `entity`, e.g. its block record
    fn owner_of(&self, entity: &DxfEntity) -> Option<&DxfEntity> {
        entity.owner().and_then(|h| self.resolve(h))
    }
}

/// Entities keyed by handle in insertion order
#[derive(Debug, Clone, Default)]
pub struct EntityDb {
    entities: IndexMap<Handle, DxfEntity>,
    next_handle: u64,
}

impl EntityDb {
    pub fn new() -> Self {
        Self {
            entities: IndexMap::new(),
            next_handle: 1,
        }
    }

    /// Add an entity and return its handle.
    ///
    /// Entities without handle, with the null handle or with a handle already
    /// in use get a new one.
    pub fn add(&mut self, mut entity: DxfEntity, notifications: &mut NotificationCollection) -> Result<Handle> {
        let handle = match entity.handle() {
            Some(h) if !h.is_null() && !self.entities.contains_key(&h) => h,
            existing => {
                let handle = self.allocate()?;
                if let Some(old) = existing.filter(|h| !h.is_null()) {
                    notifications.notify(
                        NotificationType::Warning,
                        format!(
                            "duplicate handle {} of {}, replaced by {}",
                            old.to_hex(),
                            entity.dxftype(),
                            handle.to_hex()
                        ),
                    );
                }
                entity.set_handle(handle)?;
                handle
            }
        };
        self.next_handle = self.next_handle.max(handle.value().saturating_add(1));
        self.entities.insert(handle, entity);
        Ok(handle)
    }

    /// Next unused handle; wraps around to 1 after the largest handle
    fn allocate(&mut self) -> Result<Handle> {
        let start = self.next_handle.max(1);
        let value = (start..=u64::MAX)
            .chain(1..start)
            .find(|&v| !self.entities.contains_key(&Handle::new(v)))
            .ok_or_else(|| DxfError::Custom("no free entity handle".to_string()))?;
        self.next_handle = value.saturating_add(1);
        Ok(Handle::new(value))
    }

    pub fn get(&self, handle: Handle) -> Option<&DxfEntity> {
        self.entities.get(&handle)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut DxfEntity> {
        self.entities.get_mut(&handle)
    }

    pub fn remove(&mut self, handle: Handle) -> Option<DxfEntity> {
        self.entities.shift_remove(&handle)
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.entities.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &DxfEntity> + '_ {
        self.entities.values()
    }

    /// Entities of `dxftype` in insertion order
    pub fn query<'a>(&'a self, dxftype: &'a str) -> impl Iterator<Item = &'a DxfEntity> + 'a {
        self.entities.values().filter(move |e| e.dxftype() == dxftype)
    }
}

impl EntityResolver for EntityDb {
    fn resolve(&self, handle: Handle) -> Option<&DxfEntity> {
        self.get(handle)
    }
}
