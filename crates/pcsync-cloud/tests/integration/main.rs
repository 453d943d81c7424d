//! Integration tests for pcsync-cloud
//!
//! Uses wiremock to simulate the pCloud API and verifies end-to-end
//! behavior of the PCloudClient and the PCloudStore adapter.

mod common;

mod test_checksum;
mod test_listing;
mod test_transfer;
