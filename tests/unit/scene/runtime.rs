use super::*;

#[path = "../support.rs"]
mod support;

use support::{FakeNode, FakePlayer, FakeTree};

#[test]
fn playback_info_defaults_are_stopped() {
    let info = PlaybackInfo::default();
    assert!(!info.playing);
    assert_eq!(info.frame, 0);
}

#[test]
fn fake_player_reports_state_at_call_time() {
    let player = FakePlayer::new();
    assert!(!player.playback().playing);
    player.probe.playing.set(true);
    assert!(player.playback().playing);
}

#[test]
fn render_tree_lookup_misses_cleanly() {
    let mut tree = FakeTree::default();
    tree.insert(
        "text-a",
        FakeNode::boxed(Affine::IDENTITY, 100.0, 50.0),
    );
    assert!(tree.node("text-a").is_some());
    assert!(tree.node("text-b").is_none());
}
