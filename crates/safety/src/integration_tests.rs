//! Integration tests for the safety screen using the `TestScreen` harness.
//!
//! These tests run a headless Bevy App with `SafetyScreenPlugin` and a
//! scripted location provider, and check the frame-by-frame behavior of the
//! whole pipeline.
