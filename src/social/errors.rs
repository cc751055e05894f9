use thiserror::Error;

/// Errors that can arise from social graph operations.
///
/// Every variant is a recoverable, caller-surfaced condition; the graph never
/// panics, logs, or prints on failure. The presentation layer owns the 1:1
/// mapping from these kinds to user-facing text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SocialError {
    /// Registration with an empty login.
    #[error("invalid login")]
    InvalidLogin,

    /// Registration with an empty password.
    #[error("invalid password")]
    InvalidPassword,

    /// Registration under a login that is already taken.
    #[error("account already exists")]
    AccountExists,

    /// Session open failure; unknown login and wrong password collapse into
    /// this one kind so callers cannot tell which field was wrong.
    #[error("invalid login or password")]
    InvalidCredentials,

    /// A login or session token that does not resolve to a registered user.
    #[error("user not registered")]
    UnknownUser,

    /// An operation whose target is the acting user.
    #[error("self-directed relation")]
    SelfReference,

    /// Friend edge already present.
    #[error("already friends")]
    AlreadyFriends,

    /// A friend request to the same target is still awaiting acceptance.
    #[error("friend request already pending")]
    InviteAlreadyPending,

    /// Idol edge already present.
    #[error("already an idol")]
    AlreadyIdol,

    /// Crush edge already present.
    #[error("already a crush")]
    AlreadyCrush,

    /// Enemy edge already present.
    #[error("already an enemy")]
    AlreadyEnemy,

    /// Joining a community the user already belongs to.
    #[error("already a member")]
    AlreadyMember,

    /// Reading a custom profile attribute that was never set.
    #[error("attribute not set")]
    AttributeNotSet,

    /// Either party lists the other as an enemy; carries the counterpart's
    /// display name for the user-facing message.
    #[error("interaction blocked by {name}")]
    InteractionBlocked { name: String },

    /// Creating a community under a name that is already taken.
    #[error("community already exists")]
    CommunityExists,

    /// A community name that does not resolve.
    #[error("community not found")]
    CommunityNotFound,

    /// Reading from an empty message queue.
    #[error("no messages")]
    NoMessages,

    /// A structurally invalid argument, named for the message (blank
    /// community fields, writes to the immutable login key).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}
