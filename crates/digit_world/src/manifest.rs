//! Sounds preloaded behind the splash screen

use arcade_engine::loading::ManifestEntry;

/// Every sound effect the game uses, in loading order
pub const SOUND_MANIFEST: [ManifestEntry; 16] = [
    ManifestEntry::new("jump", "jump.mp3", 0.05),
    ManifestEntry::new("hit", "hit.mp3", 0.0),
    ManifestEntry::new("pickup", "pickup.mp3", 0.02),
    ManifestEntry::new("stage_clear", "stage_clear.mp3", 0.01),
    ManifestEntry::new("enemy_spawn", "enemy_spawn.mp3", 0.1),
    ManifestEntry::new("miss", "miss.mp3", 0.02),
    ManifestEntry::new("pi", "pi.mp3", 0.1),
    ManifestEntry::new("speed_up", "speed.mp3", 0.1),
    ManifestEntry::new("loop_reset", "loop_reset.mp3", 0.1),
    ManifestEntry::new("key_spawn", "key_spawn.mp3", 0.05),
    ManifestEntry::new("select", "select.mp3", 0.1),
    ManifestEntry::new("stage_in", "stage_in.mp3", 0.1),
    ManifestEntry::new("unmove", "unmove.mp3", 0.1),
    ManifestEntry::new("ex_open", "ex_open.mp3", 0.1),
    ManifestEntry::new("title_in", "title_in.mp3", 0.1),
    ManifestEntry::new("spawn_one", "spawn_one.mp3", 0.02),
];
