pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, TokenPair};
pub use auth_service_impl::SeaOrmAuthService;

pub mod subreddit_service;
pub mod subreddit_service_impl;
pub use subreddit_service::{SubredditDto, SubredditError, SubredditService};
pub use subreddit_service_impl::SeaOrmSubredditService;

pub mod post_service;
pub mod post_service_impl;
pub use post_service::{CreatePost, PostError, PostResponse, PostService};
pub use post_service_impl::SeaOrmPostService;

pub mod comment_service;
pub mod comment_service_impl;
pub use comment_service::{CommentDto, CommentError, CommentService};
pub use comment_service_impl::SeaOrmCommentService;

pub mod vote_service;
pub mod vote_service_impl;
pub use vote_service::{VoteDirection, VoteError, VoteService};
pub use vote_service_impl::SeaOrmVoteService;

pub mod mail;
pub use mail::{LogMailer, MailError, Mailer, NotificationEmail};
