//! Level curve: `level = floor(sqrt(xp / 100)) + 1`

/// XP scale of the curve
const XP_PER_LEVEL_UNIT: u64 = 100;

fn isqrt(n: u64) -> u64 {
    let mut root = (n as f64).sqrt() as u64;
    while root.saturating_mul(root) > n {
        root -= 1;
    }
    while (root + 1).saturating_mul(root + 1) <= n {
        root += 1;
    }
    root
}

/// Level reached with `xp` experience points. Never below 1.
pub fn level_for_xp(xp: u64) -> u32 {
    let level = isqrt(xp / XP_PER_LEVEL_UNIT) + 1;
    level.min(u32::MAX as u64) as u32
}

/// Level for an untrusted XP value; negative or non-finite input counts as 0
pub fn level_for_raw_xp(xp: f64) -> u32 {
    if xp.is_finite() && xp > 0.0 {
        level_for_xp(xp.floor() as u64)
    } else {
        1
    }
}

/// Total XP needed to move past `level`, i.e. the floor of `level + 1`
pub fn xp_required_for_level(level: u32) -> u64 {
    let level = level as u64;
    level.saturating_mul(level).saturating_mul(XP_PER_LEVEL_UNIT)
}

/// Total XP at which `level` starts
pub fn xp_floor_for_level(level: u32) -> u64 {
    if level <= 1 {
        0
    } else {
        xp_required_for_level(level - 1)
    }
}

/// XP still missing before the next level
pub fn xp_to_next_level(xp: u64) -> u64 {
    xp_required_for_level(level_for_xp(xp)).saturating_sub(xp)
}

/// Progress through `level` in percent, clamped to [0, 100]
pub fn progress_percent(xp: u64, level: u32) -> f32 {
    let level = level.max(1);
    let floor = xp_floor_for_level(level);
    let ceiling = xp_required_for_level(level);
    let span = ceiling.saturating_sub(floor);
    if span == 0 || xp <= floor {
        return 0.0;
    }
    let percent = (xp - floor) as f64 / span as f64 * 100.0;
    percent.clamp(0.0, 100.0) as f32
}
