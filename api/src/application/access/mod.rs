use uuid::Uuid;

use crate::application::error::AppError;
use crate::domain::accounts::user::User;
use crate::domain::bookbank::book::BookPost;
use crate::domain::bookbank::request::BookRequest;
use crate::domain::lostfound::item::LostFoundItem;
use crate::domain::noticeboard::comment::EventComment;
use crate::domain::noticeboard::event::Event;
use crate::domain::noticeboard::registration::EventRegistration;
use crate::domain::roommate::post::RoommatePost;

// Handlers build the Identity from the authenticated user.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl Identity {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    User(Identity),
}

impl Actor {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Actor::Anonymous => None,
            Actor::User(identity) => Some(identity),
        }
    }

    pub fn is_staff(&self) -> bool {
        self.identity().map(|i| i.is_staff).unwrap_or(false)
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.identity().map(|i| i.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

/// Where a resource records the account that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerRef {
    Reporter(Uuid),
    PostedBy(Uuid),
    User(Uuid),
    Organizer(Uuid),
    /// The resource is the account itself.
    Account(Uuid),
}

impl OwnerRef {
    pub fn owner_id(&self) -> Uuid {
        match *self {
            OwnerRef::Reporter(id)
            | OwnerRef::PostedBy(id)
            | OwnerRef::User(id)
            | OwnerRef::Organizer(id)
            | OwnerRef::Account(id) => id,
        }
    }
}

pub trait Owned {
    fn owner_ref(&self) -> OwnerRef;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    OwnerOrReadOnly,
    AdminOrReadOnly,
    SelfOrAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Unauthenticated,
    Forbidden,
}

/// Evaluates `policy` for `actor` acting on `target`.
///
/// Reads are always allowed. Writes from anonymous actors are reported as
/// unauthenticated; staff may write anything.
pub fn evaluate(policy: Policy, actor: &Actor, kind: AccessKind, target: Option<OwnerRef>) -> Decision {
    if kind == AccessKind::Read {
        return Decision::Allow;
    }
    let identity = match actor {
        Actor::Anonymous => return Decision::Unauthenticated,
        Actor::User(identity) => identity,
    };
    if identity.is_staff {
        return Decision::Allow;
    }
    let allowed = match (policy, target) {
        (Policy::AdminOrReadOnly, _) => false,
        (Policy::OwnerOrReadOnly, Some(owner)) => owner.owner_id() == identity.id,
        (Policy::SelfOrAdmin, Some(OwnerRef::Account(id))) => id == identity.id,
        (Policy::SelfOrAdmin, Some(_)) => false,
        (_, None) => false,
    };
    if allowed {
        Decision::Allow
    } else {
        Decision::Forbidden
    }
}

pub fn require<T: Owned + ?Sized>(
    policy: Policy,
    actor: &Actor,
    kind: AccessKind,
    target: &T,
) -> Result<(), AppError> {
    into_result(evaluate(policy, actor, kind, Some(target.owner_ref())))
}

/// Owner-or-staff gate for writes by an authenticated identity.
pub fn require_owner<T: Owned + ?Sized>(identity: &Identity, target: &T) -> Result<(), AppError> {
    require(
        Policy::OwnerOrReadOnly,
        &Actor::User(*identity),
        AccessKind::Write,
        target,
    )
}

pub fn require_staff(identity: &Identity) -> Result<(), AppError> {
    into_result(evaluate(
        Policy::AdminOrReadOnly,
        &Actor::User(*identity),
        AccessKind::Write,
        None,
    ))
}

fn into_result(decision: Decision) -> Result<(), AppError> {
    match decision {
        Decision::Allow => Ok(()),
        Decision::Unauthenticated => Err(AppError::Unauthenticated),
        Decision::Forbidden => Err(AppError::forbidden()),
    }
}

impl Owned for OwnerRef {
    fn owner_ref(&self) -> OwnerRef {
        *self
    }
}

impl Owned for User {
    fn owner_ref(&self) -> OwnerRef {
        OwnerRef::Account(self.id)
    }
}

impl Owned for BookPost {
    fn owner_ref(&self) -> OwnerRef {
        OwnerRef::PostedBy(self.posted_by)
    }
}

impl Owned for BookRequest {
    fn owner_ref(&self) -> OwnerRef {
        OwnerRef::User(self.requested_by)
    }
}

impl Owned for LostFoundItem {
    fn owner_ref(&self) -> OwnerRef {
        OwnerRef::Reporter(self.reporter)
    }
}

impl Owned for Event {
    fn owner_ref(&self) -> OwnerRef {
        OwnerRef::Organizer(self.organizer)
    }
}

impl Owned for EventComment {
    fn owner_ref(&self) -> OwnerRef {
        OwnerRef::User(self.user_id)
    }
}

impl Owned for EventRegistration {
    fn owner_ref(&self) -> OwnerRef {
        OwnerRef::User(self.user_id)
    }
}

impl Owned for RoommatePost {
    fn owner_ref(&self) -> OwnerRef {
        OwnerRef::User(self.user_id)
    }
}
