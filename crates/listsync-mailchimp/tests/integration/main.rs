//! Integration tests for listsync-mailchimp
//!
//! Uses wiremock to simulate the Mailchimp Marketing API and verifies
//! end-to-end behavior of the MailchimpClient, the IRemoteApi adapter,
//! and the sync use cases running against both.

mod common;

mod test_client;
mod test_remote_api;
mod test_sync_flow;
