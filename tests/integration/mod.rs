//! Live integration tests against the real Where's It Up API.
//!
//! These tests spend real job credits and are ignored by default. To run
//! them:
//!
//! 1. Put `WIUPPY_CLIENT` / `WIUPPY_TOKEN` in the environment or a `.env`
//!    file in the project root
//!
//! 2. Run with: `cargo test -- --ignored`

mod live;
