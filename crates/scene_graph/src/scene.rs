//! Arena storage for scene objects.
//!
//! Objects of any type live in one [`SlotMap`] and reference each other
//! through handles, so the object graph may contain cycles without any
//! object owning another. Removing an object is explicit and also drops
//! every link that mentions it.

use std::any::{Any, TypeId};
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use slotmap::{KeyData, SlotMap};

use crate::error::SceneError;
use crate::link::LinkIndex;
use crate::space::AffineSpace;

slotmap::new_key_type! {
    /// Untyped identifier of an object within a [`Scene`].
    pub struct ObjectId;
}

impl From<u64> for ObjectId {
    fn from(value: u64) -> Self {
        Self(KeyData::from_ffi(value))
    }
}

impl ObjectId {
    /// Converts this object id to a [u64]
    pub fn as_u64(self) -> u64 {
        self.0.as_ffi()
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u64())
    }
}

/// Implemented by every type that can be stored in a [`Scene`].
pub trait SceneObject: Any {
    /// Human readable type name, used in error messages and logs.
    const TYPE_NAME: &'static str;
}

/// Typed, copyable reference to an object of type `T` in a [`Scene`].
pub struct Handle<T> {
    id: ObjectId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub(crate) fn from_id(id: ObjectId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    pub fn id(self) -> ObjectId {
        self.id
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T: SceneObject> Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", T::TYPE_NAME, self.id)
    }
}

impl<T> From<Handle<T>> for ObjectId {
    fn from(handle: Handle<T>) -> Self {
        handle.id
    }
}

struct Entry {
    type_id: TypeId,
    type_name: &'static str,
    seq: u64,
    value: Box<dyn Any>,
}

/// The scene: every object of a synthesized page plus the links between them.
pub struct Scene {
    objects: SlotMap<ObjectId, Entry>,
    pub(crate) links: LinkIndex,
    next_seq: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
            links: LinkIndex::default(),
            next_seq: 0,
        }
    }

    /// Stores a new object and returns its handle
    pub fn insert<T: SceneObject>(&mut self, value: T) -> Handle<T> {
        let seq = self.next_seq;
        self.next_seq += 1;

        let id = self.objects.insert(Entry {
            type_id: TypeId::of::<T>(),
            type_name: T::TYPE_NAME,
            seq,
            value: Box::new(value),
        });
        Handle::from_id(id)
    }

    pub fn get<T: SceneObject>(&self, handle: Handle<T>) -> Option<&T> {
        self.objects
            .get(handle.id)
            .and_then(|entry| entry.value.downcast_ref::<T>())
    }

    pub fn get_mut<T: SceneObject>(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.objects
            .get_mut(handle.id)
            .and_then(|entry| entry.value.downcast_mut::<T>())
    }

    /// Like [`Scene::get`], but a stale handle is an error
    pub fn try_get<T: SceneObject>(&self, handle: Handle<T>) -> Result<&T, SceneError> {
        self.get(handle).ok_or(SceneError::MissingObject {
            type_name: T::TYPE_NAME,
            id: handle.id,
        })
    }

    pub fn try_get_mut<T: SceneObject>(&mut self, handle: Handle<T>) -> Result<&mut T, SceneError> {
        self.get_mut(handle).ok_or(SceneError::MissingObject {
            type_name: T::TYPE_NAME,
            id: handle.id,
        })
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    pub(crate) fn ensure_present<T: SceneObject>(&self, handle: Handle<T>) -> Result<(), SceneError> {
        self.try_get(handle).map(|_| ())
    }

    /// Type name of a live object
    pub fn type_name_of(&self, id: ObjectId) -> Option<&'static str> {
        self.objects.get(id).map(|entry| entry.type_name)
    }

    /// Recovers a typed handle when the object is a live `T`
    pub fn downcast<T: SceneObject>(&self, id: ObjectId) -> Option<Handle<T>> {
        self.objects
            .get(id)
            .filter(|entry| entry.type_id == TypeId::of::<T>())
            .map(|_| Handle::from_id(id))
    }

    /// Returns every live object of type `T`, in creation order
    pub fn find<T: SceneObject>(&self) -> Vec<Handle<T>> {
        let mut found: Vec<(u64, ObjectId)> = self
            .objects
            .iter()
            .filter(|(_, entry)| entry.type_id == TypeId::of::<T>())
            .map(|(id, entry)| (entry.seq, id))
            .collect();
        found.sort_unstable_by_key(|(seq, _)| *seq);
        found.into_iter().map(|(_, id)| Handle::from_id(id)).collect()
    }

    /// Number of live objects of any type
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Removes an object from the scene together with every link it declares
    /// and every link pointing at it.
    ///
    /// Removing an affine space detaches it from its parent and leaves its
    /// children as roots. Returns `false` when the object was not present.
    pub fn remove(&mut self, id: impl Into<ObjectId>) -> bool {
        let id = id.into();
        if !self.objects.contains_key(id) {
            return false;
        }

        if let Some(space) = self.downcast::<AffineSpace>(id) {
            self.unhook_space(space);
        }

        self.links.forget(id);
        let removed = self.objects.remove(id);
        if let Some(entry) = &removed {
            log::trace!("removed {} {}", entry.type_name, id);
        }
        removed.is_some()
    }
}
