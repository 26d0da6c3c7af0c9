//! Typed links between scene objects and the relationship queries over them.
//!
//! A link slot is a named field declared by an owner type, described by a
//! [`Field`] constant on that type (for example `Notehead::NOTES`). Links are
//! recorded in both directions at assignment time, so asking "which owners
//! hold this object in their `notes` slot?" walks only the matching inlinks
//! instead of scanning the whole scene.
//!
//! The three query primitives follow the same pattern:
//!
//! - [`Scene::many_of`]: every owner, in link order. Requires a subject.
//! - [`Scene::of_or_none`]: at most one owner. A missing subject yields `None`,
//!   which makes chained optional lookups convenient.
//! - [`Scene::of`]: exactly one owner. Requires a subject.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use smallvec::SmallVec;

use crate::error::SceneError;
use crate::scene::{Handle, ObjectId, Scene, SceneObject};

/// Identifies one link slot: the declaring owner type plus the field name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LinkKey {
    owner: TypeId,
    owner_name: &'static str,
    field: &'static str,
}

impl LinkKey {
    pub fn owner_name(&self) -> &'static str {
        self.owner_name
    }

    pub fn field_name(&self) -> &'static str {
        self.field
    }
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner_name, self.field)
    }
}

/// A link slot declared by owner type `O` that holds objects of type `T`.
///
/// Whether the slot is scalar or a collection is decided by how it is
/// written: [`Scene::set_link`] keeps at most one target, [`Scene::push_link`]
/// and [`Scene::set_links`] keep an ordered list.
pub struct Field<O, T> {
    name: &'static str,
    _marker: PhantomData<fn(O) -> T>,
}

impl<O, T> Clone for Field<O, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O, T> Copy for Field<O, T> {}

impl<O: SceneObject, T: SceneObject> Field<O, T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn key(&self) -> LinkKey {
        LinkKey {
            owner: TypeId::of::<O>(),
            owner_name: O::TYPE_NAME,
            field: self.name,
        }
    }
}

impl<O: SceneObject, T: SceneObject> fmt::Debug for Field<O, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", O::TYPE_NAME, self.name)
    }
}

/// One incoming link: `source` holds the target in its `key` slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Inlink {
    pub source: ObjectId,
    pub key: LinkKey,
}

#[derive(Debug)]
struct Slot {
    key: LinkKey,
    targets: Vec<ObjectId>,
}

/// Bidirectional link bookkeeping.
///
/// Outlinks are kept per source object as a short list of slots; inlinks are
/// kept per target in the order the links were made.
#[derive(Debug, Default)]
pub(crate) struct LinkIndex {
    outlinks: HashMap<ObjectId, SmallVec<[Slot; 4]>>,
    inlinks: HashMap<ObjectId, Vec<Inlink>>,
}

impl LinkIndex {
    fn slot(&self, source: ObjectId, key: LinkKey) -> Option<&Slot> {
        self.outlinks
            .get(&source)
            .and_then(|slots| slots.iter().find(|slot| slot.key == key))
    }

    pub(crate) fn targets(&self, source: ObjectId, key: LinkKey) -> &[ObjectId] {
        self.slot(source, key)
            .map(|slot| slot.targets.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn inlinks(&self, target: ObjectId) -> &[Inlink] {
        self.inlinks
            .get(&target)
            .map(|links| links.as_slice())
            .unwrap_or(&[])
    }

    /// Sources holding `target` in a `key` slot, each listed once, in link order
    pub(crate) fn sources(&self, target: ObjectId, key: LinkKey) -> SmallVec<[ObjectId; 4]> {
        let mut sources: SmallVec<[ObjectId; 4]> = SmallVec::new();
        for link in self.inlinks(target) {
            if link.key == key && !sources.contains(&link.source) {
                sources.push(link.source);
            }
        }
        sources
    }

    pub(crate) fn push(&mut self, source: ObjectId, key: LinkKey, target: ObjectId) {
        let slots = self.outlinks.entry(source).or_default();
        match slots.iter_mut().find(|slot| slot.key == key) {
            Some(slot) => slot.targets.push(target),
            None => slots.push(Slot {
                key,
                targets: vec![target],
            }),
        }
        self.inlinks
            .entry(target)
            .or_default()
            .push(Inlink { source, key });
    }

    /// Removes one occurrence of `target` from the slot
    pub(crate) fn remove_one(&mut self, source: ObjectId, key: LinkKey, target: ObjectId) -> bool {
        let Some(slot) = self
            .outlinks
            .get_mut(&source)
            .and_then(|slots| slots.iter_mut().find(|slot| slot.key == key))
        else {
            return false;
        };
        let Some(position) = slot.targets.iter().position(|t| *t == target) else {
            return false;
        };
        slot.targets.remove(position);
        self.drop_inlink(target, source, key);
        true
    }

    /// Empties the slot, returning what it held
    pub(crate) fn clear(&mut self, source: ObjectId, key: LinkKey) -> Vec<ObjectId> {
        let targets = self
            .outlinks
            .get_mut(&source)
            .and_then(|slots| slots.iter_mut().find(|slot| slot.key == key))
            .map(|slot| std::mem::take(&mut slot.targets))
            .unwrap_or_default();
        for target in &targets {
            self.drop_inlink(*target, source, key);
        }
        targets
    }

    /// Drops every link declared by `id` and every link pointing at `id`
    pub(crate) fn forget(&mut self, id: ObjectId) {
        if let Some(slots) = self.outlinks.remove(&id) {
            for slot in slots {
                for target in slot.targets {
                    self.drop_inlink(target, id, slot.key);
                }
            }
        }

        if let Some(inlinks) = self.inlinks.remove(&id) {
            for link in inlinks {
                if let Some(slot) = self
                    .outlinks
                    .get_mut(&link.source)
                    .and_then(|slots| slots.iter_mut().find(|slot| slot.key == link.key))
                {
                    slot.targets.retain(|target| *target != id);
                }
            }
        }
    }

    fn drop_inlink(&mut self, target: ObjectId, source: ObjectId, key: LinkKey) {
        if let Some(links) = self.inlinks.get_mut(&target) {
            if let Some(position) = links
                .iter()
                .position(|link| link.source == source && link.key == key)
            {
                links.remove(position);
            }
            if links.is_empty() {
                self.inlinks.remove(&target);
            }
        }
    }
}

impl Scene {
    /// Sets a scalar slot, replacing whatever it held. `None` clears it.
    pub fn set_link<O: SceneObject, T: SceneObject>(
        &mut self,
        owner: Handle<O>,
        field: Field<O, T>,
        target: Option<Handle<T>>,
    ) -> Result<(), SceneError> {
        self.ensure_present(owner)?;
        if let Some(target) = target {
            self.ensure_present(target)?;
        }

        self.links.clear(owner.id(), field.key());
        if let Some(target) = target {
            self.links.push(owner.id(), field.key(), target.id());
        }
        Ok(())
    }

    /// Appends a target to a collection slot
    pub fn push_link<O: SceneObject, T: SceneObject>(
        &mut self,
        owner: Handle<O>,
        field: Field<O, T>,
        target: Handle<T>,
    ) -> Result<(), SceneError> {
        self.ensure_present(owner)?;
        self.ensure_present(target)?;
        self.links.push(owner.id(), field.key(), target.id());
        Ok(())
    }

    /// Replaces the whole contents of a collection slot
    pub fn set_links<O: SceneObject, T: SceneObject>(
        &mut self,
        owner: Handle<O>,
        field: Field<O, T>,
        targets: impl IntoIterator<Item = Handle<T>>,
    ) -> Result<(), SceneError> {
        self.ensure_present(owner)?;
        let targets: Vec<Handle<T>> = targets.into_iter().collect();
        for target in &targets {
            self.ensure_present(*target)?;
        }

        self.links.clear(owner.id(), field.key());
        for target in targets {
            self.links.push(owner.id(), field.key(), target.id());
        }
        Ok(())
    }

    /// Removes one occurrence of `target` from the slot
    pub fn remove_link<O: SceneObject, T: SceneObject>(
        &mut self,
        owner: Handle<O>,
        field: Field<O, T>,
        target: Handle<T>,
    ) -> bool {
        self.links.remove_one(owner.id(), field.key(), target.id())
    }

    pub fn clear_links<O: SceneObject, T: SceneObject>(&mut self, owner: Handle<O>, field: Field<O, T>) {
        self.links.clear(owner.id(), field.key());
    }

    /// The first (for scalar slots, the only) target of a slot
    pub fn link<O: SceneObject, T: SceneObject>(
        &self,
        owner: Handle<O>,
        field: Field<O, T>,
    ) -> Option<Handle<T>> {
        self.links
            .targets(owner.id(), field.key())
            .first()
            .map(|id| Handle::from_id(*id))
    }

    /// Like [`Scene::link`], but an empty slot is an error
    pub fn required_link<O: SceneObject, T: SceneObject>(
        &self,
        owner: Handle<O>,
        field: Field<O, T>,
    ) -> Result<Handle<T>, SceneError> {
        self.link(owner, field).ok_or(SceneError::UnsetLink {
            owner: O::TYPE_NAME,
            field: field.name(),
            id: owner.id(),
        })
    }

    /// All targets of a slot, in order
    pub fn links<O: SceneObject, T: SceneObject>(
        &self,
        owner: Handle<O>,
        field: Field<O, T>,
    ) -> Vec<Handle<T>> {
        self.links
            .targets(owner.id(), field.key())
            .iter()
            .map(|id| Handle::from_id(*id))
            .collect()
    }

    /// Every incoming link of an object across all slots, in link order
    pub fn inlinks(&self, target: impl Into<ObjectId>) -> &[Inlink] {
        self.links.inlinks(target.into())
    }

    /// Returns every owner whose `field` slot contains the subject, in the
    /// order the links were made. Each owner is listed once.
    pub fn many_of<O: SceneObject, T: SceneObject>(
        &self,
        subject: impl Into<Option<Handle<T>>>,
        field: Field<O, T>,
    ) -> Result<Vec<Handle<O>>, SceneError> {
        let subject = subject.into().ok_or(SceneError::NullSubject {
            query: "many_of",
            owner: O::TYPE_NAME,
            field: field.name(),
        })?;
        Ok(self.owners(subject, field))
    }

    /// Returns the single owner linking the subject, `None` if there is no
    /// owner or no subject, and an error if there are several owners.
    pub fn of_or_none<O: SceneObject, T: SceneObject>(
        &self,
        subject: impl Into<Option<Handle<T>>>,
        field: Field<O, T>,
    ) -> Result<Option<Handle<O>>, SceneError> {
        let Some(subject) = subject.into() else {
            return Ok(None);
        };
        let owners = self.owners(subject, field);
        match owners.as_slice() {
            [] => Ok(None),
            [owner] => Ok(Some(*owner)),
            _ => Err(SceneError::RelationshipResolution {
                owner: O::TYPE_NAME,
                field: field.name(),
                expected: "at most one",
                found: owners.len(),
            }),
        }
    }

    /// Returns the one owner linking the subject. Zero or several owners,
    /// or a missing subject, are errors.
    pub fn of<O: SceneObject, T: SceneObject>(
        &self,
        subject: impl Into<Option<Handle<T>>>,
        field: Field<O, T>,
    ) -> Result<Handle<O>, SceneError> {
        let subject = subject.into().ok_or(SceneError::NullSubject {
            query: "of",
            owner: O::TYPE_NAME,
            field: field.name(),
        })?;
        let owners = self.owners(subject, field);
        match owners.as_slice() {
            [owner] => Ok(*owner),
            _ => Err(SceneError::RelationshipResolution {
                owner: O::TYPE_NAME,
                field: field.name(),
                expected: "exactly one",
                found: owners.len(),
            }),
        }
    }

    fn owners<O: SceneObject, T: SceneObject>(
        &self,
        subject: Handle<T>,
        field: Field<O, T>,
    ) -> Vec<Handle<O>> {
        self.links
            .sources(subject.id(), field.key())
            .into_iter()
            .map(Handle::from_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Letter(char);

    impl SceneObject for Letter {
        const TYPE_NAME: &'static str = "Letter";
    }

    #[derive(Debug)]
    struct Word;

    impl SceneObject for Word {
        const TYPE_NAME: &'static str = "Word";
    }

    impl Word {
        const LETTERS: Field<Word, Letter> = Field::new("letters");
        const FIRST: Field<Word, Letter> = Field::new("first");

        fn build(scene: &mut Scene, text: &str) -> (Handle<Word>, Vec<Handle<Letter>>) {
            let letters: Vec<_> = text.chars().map(|c| scene.insert(Letter(c))).collect();
            let word = Self::from_letters(scene, &letters);
            (word, letters)
        }

        fn from_letters(scene: &mut Scene, letters: &[Handle<Letter>]) -> Handle<Word> {
            let word = scene.insert(Word);
            scene
                .set_links(word, Self::LETTERS, letters.iter().copied())
                .unwrap();
            word
        }

        fn of_letter(scene: &Scene, letter: Handle<Letter>) -> Result<Handle<Word>, SceneError> {
            scene.of(letter, Self::LETTERS)
        }

        fn of_letter_or_none(
            scene: &Scene,
            letter: Option<Handle<Letter>>,
        ) -> Result<Option<Handle<Word>>, SceneError> {
            scene.of_or_none(letter, Self::LETTERS)
        }

        fn many_of_letter(scene: &Scene, letter: Handle<Letter>) -> Result<Vec<Handle<Word>>, SceneError> {
            scene.many_of(letter, Self::LETTERS)
        }
    }

    #[test]
    fn test_standalone_letter_has_no_word() {
        let mut scene = Scene::new();
        let letter = scene.insert(Letter('A'));

        assert!(scene.many_of(letter, Word::LETTERS).unwrap().is_empty());
        assert_eq!(scene.of_or_none(letter, Word::LETTERS).unwrap(), None);
        assert!(matches!(
            scene.of(letter, Word::LETTERS),
            Err(SceneError::RelationshipResolution { found: 0, .. })
        ));

        assert!(Word::many_of_letter(&scene, letter).unwrap().is_empty());
        assert_eq!(Word::of_letter_or_none(&scene, Some(letter)).unwrap(), None);
        assert!(Word::of_letter(&scene, letter).is_err());
    }

    #[test]
    fn test_word_letter_has_a_word() {
        let mut scene = Scene::new();
        let (word, letters) = Word::build(&mut scene, "ABCD");
        let letter = letters[0];

        assert_eq!(scene.many_of(letter, Word::LETTERS).unwrap(), vec![word]);
        assert_eq!(scene.of_or_none(letter, Word::LETTERS).unwrap(), Some(word));
        assert_eq!(scene.of(letter, Word::LETTERS).unwrap(), word);

        assert_eq!(Word::many_of_letter(&scene, letter).unwrap(), vec![word]);
        assert_eq!(Word::of_letter_or_none(&scene, Some(letter)).unwrap(), Some(word));
        assert_eq!(Word::of_letter(&scene, letter).unwrap(), word);
    }

    #[test]
    fn test_letter_in_many_words() {
        let mut scene = Scene::new();
        let (word, letters) = Word::build(&mut scene, "ABCD");
        let word_ab = Word::from_letters(&mut scene, &letters[0..2]);
        let word_bc = Word::from_letters(&mut scene, &letters[1..3]);
        let letter = letters[1];
        assert_eq!(scene.get(letter).unwrap().0, 'B');

        let expected = vec![word, word_ab, word_bc];
        assert_eq!(scene.many_of(letter, Word::LETTERS).unwrap(), expected);
        assert!(matches!(
            scene.of_or_none(letter, Word::LETTERS),
            Err(SceneError::RelationshipResolution {
                expected: "at most one",
                found: 3,
                ..
            })
        ));
        assert!(matches!(
            scene.of(letter, Word::LETTERS),
            Err(SceneError::RelationshipResolution {
                expected: "exactly one",
                found: 3,
                ..
            })
        ));

        // every returned owner actually holds the letter
        for owner in scene.many_of(letter, Word::LETTERS).unwrap() {
            assert!(scene.links(owner, Word::LETTERS).contains(&letter));
        }
    }

    #[test]
    fn test_null_subject_is_handled() {
        let scene = Scene::new();
        let none: Option<Handle<Letter>> = None;

        assert!(matches!(
            scene.of(none, Word::LETTERS),
            Err(SceneError::NullSubject { query: "of", .. })
        ));
        assert_eq!(scene.of_or_none(none, Word::LETTERS).unwrap(), None);
        assert!(matches!(
            scene.many_of(none, Word::LETTERS),
            Err(SceneError::NullSubject { query: "many_of", .. })
        ));
    }

    #[test]
    fn test_owner_listed_once_for_repeated_target() {
        let mut scene = Scene::new();
        let letter = scene.insert(Letter('O'));
        let word = Word::from_letters(&mut scene, &[letter, letter]);

        assert_eq!(scene.many_of(letter, Word::LETTERS).unwrap(), vec![word]);
        assert_eq!(scene.links(word, Word::LETTERS).len(), 2);

        assert!(scene.remove_link(word, Word::LETTERS, letter));
        assert_eq!(scene.of(letter, Word::LETTERS).unwrap(), word);
        assert!(scene.remove_link(word, Word::LETTERS, letter));
        assert_eq!(scene.of_or_none(letter, Word::LETTERS).unwrap(), None);
    }

    #[test]
    fn test_fields_are_distinct_slots() {
        let mut scene = Scene::new();
        let (word, letters) = Word::build(&mut scene, "XY");
        scene.set_link(word, Word::FIRST, Some(letters[0])).unwrap();

        assert_eq!(scene.of(letters[0], Word::FIRST).unwrap(), word);
        assert_eq!(scene.of_or_none(letters[1], Word::FIRST).unwrap(), None);

        // scalar slots replace their target
        scene.set_link(word, Word::FIRST, Some(letters[1])).unwrap();
        assert_eq!(scene.of_or_none(letters[0], Word::FIRST).unwrap(), None);
        assert_eq!(scene.link(word, Word::FIRST), Some(letters[1]));

        scene.set_link(word, Word::FIRST, None).unwrap();
        assert!(matches!(
            scene.required_link(word, Word::FIRST),
            Err(SceneError::UnsetLink { field: "first", .. })
        ));
    }

    #[test]
    fn test_cycles_are_allowed() {
        let mut scene = Scene::new();
        let a = scene.insert(Word);
        let b = scene.insert(Word);
        const NEXT: Field<Word, Word> = Field::new("next");

        scene.set_link(a, NEXT, Some(b)).unwrap();
        scene.set_link(b, NEXT, Some(a)).unwrap();

        assert_eq!(scene.of(a, NEXT).unwrap(), b);
        assert_eq!(scene.of(b, NEXT).unwrap(), a);
    }

    #[test]
    fn test_removal_drops_links_both_ways() {
        let mut scene = Scene::new();
        let (word, letters) = Word::build(&mut scene, "ABC");

        scene.remove(letters[1]);
        assert_eq!(scene.links(word, Word::LETTERS), vec![letters[0], letters[2]]);

        scene.remove(word);
        assert!(scene.many_of(letters[0], Word::LETTERS).unwrap().is_empty());
        assert!(scene.inlinks(letters[0]).is_empty());
    }

    #[test]
    fn test_linking_stale_handle_fails() {
        let mut scene = Scene::new();
        let word = scene.insert(Word);
        let letter = scene.insert(Letter('Z'));
        scene.remove(letter);

        assert!(matches!(
            scene.push_link(word, Word::LETTERS, letter),
            Err(SceneError::MissingObject { type_name: "Letter", .. })
        ));
    }
}
