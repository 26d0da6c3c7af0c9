//! # Affine spaces
//!
//! Affine spaces define the visual hierarchy of a page. Each space is a local
//! 2D coordinate frame whose [`AffineSpace::transform`] maps local
//! coordinates into the parent's coordinates. Spaces form a strict tree: the
//! parent pointer and the ordered child list are kept in sync by
//! [`Scene::set_parent_space`], which also refuses to close a cycle.
//!
//! Non-space objects (glyphs, sprites) hang off a space by linking to it;
//! [`walk_space`] visits them in link order, then recurses into the child
//! spaces in child list order.

use synth_core::Transform;

use crate::error::SceneError;
use crate::link::Field;
use crate::scene::{Handle, ObjectId, Scene, SceneObject};

/// A node in the tree of coordinate frames.
#[derive(Debug, Clone, Default)]
pub struct AffineSpace {
    parent_space: Option<Handle<AffineSpace>>,
    children: Vec<Handle<AffineSpace>>,

    /// Maps this space's local coordinates to the parent's coordinates,
    /// i.e. defines where this space sits inside its parent.
    pub transform: Transform,
}

impl SceneObject for AffineSpace {
    const TYPE_NAME: &'static str = "AffineSpace";
}

impl AffineSpace {
    /// What other space this space belongs under
    pub const PARENT_SPACE: Field<AffineSpace, AffineSpace> = Field::new("parent_space");

    pub fn parent_space(&self) -> Option<Handle<AffineSpace>> {
        self.parent_space
    }

    pub fn children(&self) -> &[Handle<AffineSpace>] {
        &self.children
    }
}

impl Scene {
    /// Creates a space with an identity transform, optionally under a parent
    pub fn create_space(
        &mut self,
        parent: Option<Handle<AffineSpace>>,
    ) -> Result<Handle<AffineSpace>, SceneError> {
        let space = self.insert(AffineSpace::default());
        if parent.is_some() {
            self.set_parent_space(space, parent)?;
        }
        Ok(space)
    }

    /// Moves `child` under `parent`, or makes it a root when `parent` is `None`.
    ///
    /// Fails with [`SceneError::SpaceCycle`] when `parent` is `child` itself or
    /// one of its descendants; the hierarchy is left unchanged in that case.
    pub fn set_parent_space(
        &mut self,
        child: Handle<AffineSpace>,
        parent: Option<Handle<AffineSpace>>,
    ) -> Result<(), SceneError> {
        self.ensure_present(child)?;
        if let Some(parent) = parent {
            self.ensure_present(parent)?;
            if self.is_ancestor_space(child, parent) {
                return Err(SceneError::SpaceCycle {
                    child: child.id(),
                    parent: parent.id(),
                });
            }
        }

        let old_parent = self.try_get(child)?.parent_space;
        if old_parent == parent {
            return Ok(());
        }

        if let Some(old_parent) = old_parent {
            if let Some(node) = self.get_mut(old_parent) {
                node.children.retain(|c| *c != child);
            }
        }
        if let Some(parent) = parent {
            self.try_get_mut(parent)?.children.push(child);
        }
        self.try_get_mut(child)?.parent_space = parent;
        self.set_link(child, AffineSpace::PARENT_SPACE, parent)?;

        log::trace!(
            "space {} parent {:?} -> {:?}",
            child.id(),
            old_parent.map(Handle::id),
            parent.map(Handle::id)
        );
        Ok(())
    }

    pub fn set_transform(&mut self, space: Handle<AffineSpace>, transform: Transform) -> Result<(), SceneError> {
        self.try_get_mut(space)?.transform = transform;
        Ok(())
    }

    pub fn transform_of(&self, space: Handle<AffineSpace>) -> Result<Transform, SceneError> {
        Ok(self.try_get(space)?.transform)
    }

    pub fn parent_space_of(&self, space: Handle<AffineSpace>) -> Result<Option<Handle<AffineSpace>>, SceneError> {
        Ok(self.try_get(space)?.parent_space)
    }

    /// Immediate child spaces, in the order they were attached
    pub fn children_of(&self, space: Handle<AffineSpace>) -> Result<Vec<Handle<AffineSpace>>, SceneError> {
        Ok(self.try_get(space)?.children.clone())
    }

    /// Whether `ancestor` is `descendant` or lies on its parent chain
    pub fn is_ancestor_space(&self, ancestor: Handle<AffineSpace>, descendant: Handle<AffineSpace>) -> bool {
        let mut current = Some(descendant);
        let mut steps = 0;
        while let Some(space) = current {
            if space == ancestor {
                return true;
            }
            if steps > self.len() {
                return false;
            }
            steps += 1;
            current = self.get(space).and_then(|s| s.parent_space);
        }
        false
    }

    /// Returns the transform from `descendant`'s local coordinates into
    /// `space`'s coordinates by composing each edge transform on the way up.
    ///
    /// The transform from a space to itself is the identity.
    pub fn transform_from(
        &self,
        space: Handle<AffineSpace>,
        descendant: impl Into<Option<Handle<AffineSpace>>>,
    ) -> Result<Transform, SceneError> {
        let descendant = descendant.into().ok_or(SceneError::NullSubject {
            query: "transform_from",
            owner: AffineSpace::TYPE_NAME,
            field: AffineSpace::PARENT_SPACE.name(),
        })?;

        let mut transform = Transform::identity();
        let mut current = Some(descendant);
        let mut steps = 0;
        while let Some(s) = current {
            if s == space {
                return Ok(transform);
            }
            // a finite parent chain can't be longer than the scene
            if steps > self.len() {
                return Err(SceneError::SpaceCycle {
                    child: descendant.id(),
                    parent: s.id(),
                });
            }
            steps += 1;

            let node = self.try_get(s)?;
            transform = transform.then(&node.transform);
            current = node.parent_space;
        }

        Err(SceneError::NotAttached {
            ancestor: space.id(),
            descendant: descendant.id(),
        })
    }

    /// The topmost ancestor of a space (the space itself for a root)
    pub fn root_space_of(&self, space: Handle<AffineSpace>) -> Result<Handle<AffineSpace>, SceneError> {
        let mut current = space;
        let mut steps = 0;
        while let Some(parent) = self.try_get(current)?.parent_space {
            if steps > self.len() {
                return Err(SceneError::SpaceCycle {
                    child: space.id(),
                    parent: parent.id(),
                });
            }
            steps += 1;
            current = parent;
        }
        Ok(current)
    }

    /// Members of a space: the objects linking to it in link order, then its
    /// child spaces in child list order.
    pub fn space_members(&self, space: Handle<AffineSpace>) -> Result<Vec<SpaceMember>, SceneError> {
        let parent_key = AffineSpace::PARENT_SPACE.key();
        let mut members: Vec<SpaceMember> = Vec::new();
        for link in self.inlinks(space) {
            let member = SpaceMember::Object(link.source);
            if link.key != parent_key && !members.contains(&member) {
                members.push(member);
            }
        }
        members.extend(self.try_get(space)?.children.iter().map(|&child| SpaceMember::Space(child)));
        Ok(members)
    }

    /// Detaches a space being removed: out of its parent's child list, and
    /// its own children become roots.
    pub(crate) fn unhook_space(&mut self, space: Handle<AffineSpace>) {
        let (parent, children) = match self.get_mut(space) {
            Some(node) => (node.parent_space.take(), std::mem::take(&mut node.children)),
            None => return,
        };
        if let Some(parent) = parent {
            if let Some(node) = self.get_mut(parent) {
                node.children.retain(|c| *c != space);
            }
        }
        for child in children {
            if let Some(node) = self.get_mut(child) {
                node.parent_space = None;
            }
        }
    }
}

/// A member of a space, as seen by a [`SpaceVisitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceMember {
    /// A nested child space
    Space(Handle<AffineSpace>),
    /// Any other object linking to the space (glyph, sprite, ...)
    Object(ObjectId),
}

/// Walks a space hierarchy, one visitor instance per space.
///
/// The walk calls [`SpaceVisitor::create_sub_visitor`] for each child space,
/// recurses into it, then hands the finished sub-visitor back through
/// [`SpaceVisitor::accept_sub_visitor`] so results can be merged upward.
pub trait SpaceVisitor: Sized {
    fn create_sub_visitor(&self, scene: &Scene, sub_space: Handle<AffineSpace>) -> Self;

    fn accept_sub_visitor(&mut self, scene: &Scene, sub_visitor: Self);

    fn visit_object(&mut self, scene: &Scene, object: ObjectId) -> Result<(), SceneError>;
}

/// Runs `visitor` over `space` and everything nested in it, objects of a
/// space before its child spaces
pub fn walk_space<V: SpaceVisitor>(
    scene: &Scene,
    space: Handle<AffineSpace>,
    visitor: &mut V,
) -> Result<(), SceneError> {
    for member in scene.space_members(space)? {
        match member {
            SpaceMember::Space(sub_space) => {
                let mut sub_visitor = visitor.create_sub_visitor(scene, sub_space);
                walk_space(scene, sub_space, &mut sub_visitor)?;
                visitor.accept_sub_visitor(scene, sub_visitor);
            }
            SpaceMember::Object(object) => visitor.visit_object(scene, object)?,
        }
    }
    Ok(())
}
