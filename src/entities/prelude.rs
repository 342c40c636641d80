pub use super::comments::Entity as Comments;
pub use super::posts::Entity as Posts;
pub use super::refresh_tokens::Entity as RefreshTokens;
pub use super::subreddits::Entity as Subreddits;
pub use super::users::Entity as Users;
pub use super::verification_tokens::Entity as VerificationTokens;
pub use super::votes::Entity as Votes;
