mod helpers;

mod auth_test;
mod me_test;
mod moderation_test;
mod reports_test;
