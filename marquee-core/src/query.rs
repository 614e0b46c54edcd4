//! Desired-state sources
//!
//! Keyboard state is published from the key-processing path and read by
//! the render tick. Each source stores the latest value in an atomic cell
//! (`portable-atomic`, so it also works on cores without native atomics)
//! and maps it to a state index on load.
//!
//! ```ignore
//! static LAYERS: LayerQuery = LayerQuery::new();
//! static MODS: ModifierState = ModifierState::new();
//!
//! // key handler
//! LAYERS.publish(layer_state);
//! MODS.publish(get_mods() | get_oneshot_mods());
//!
//! // widget configs
//! WidgetConfig::exclusive(&LAYER_ART, 0, 0).with_query(&LAYERS);
//! WidgetConfig::toggle(SHIFT_ART, 0, 16).with_query(&SHIFT);
//! ```

use portable_atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicU8, Ordering};

use crate::traits::StateQuery;

/// Shift bits (left and right)
pub const MOD_MASK_SHIFT: u8 = 0x22;
/// Control bits
pub const MOD_MASK_CTRL: u8 = 0x11;
/// Alt bits
pub const MOD_MASK_ALT: u8 = 0x44;
/// GUI bits
pub const MOD_MASK_GUI: u8 = 0x88;

/// Always the same state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fixed(pub u8);

impl StateQuery for Fixed {
    fn desired_state(&self) -> u8 {
        self.0
    }
}

/// Highest active layer of a published 32-bit layer mask
#[derive(Debug, Default)]
pub struct LayerQuery {
    mask: AtomicU32,
}

impl LayerQuery {
    /// Create with only the base layer active
    pub const fn new() -> Self {
        Self {
            mask: AtomicU32::new(0),
        }
    }

    /// Publish the current layer mask
    pub fn publish(&self, mask: u32) {
        self.mask.store(mask, Ordering::Relaxed);
    }

    /// Highest set bit of `mask`, 0 if none
    pub const fn highest_layer(mask: u32) -> u8 {
        if mask == 0 {
            0
        } else {
            (31 - mask.leading_zeros()) as u8
        }
    }
}

impl StateQuery for LayerQuery {
    fn desired_state(&self) -> u8 {
        Self::highest_layer(self.mask.load(Ordering::Relaxed))
    }
}

/// Published modifier byte, shared by per-modifier queries
#[derive(Debug, Default)]
pub struct ModifierState {
    mods: AtomicU8,
}

impl ModifierState {
    /// Create with no modifiers held
    pub const fn new() -> Self {
        Self {
            mods: AtomicU8::new(0),
        }
    }

    /// Publish held (and one-shot) modifiers
    pub fn publish(&self, mods: u8) {
        self.mods.store(mods, Ordering::Relaxed);
    }

    /// Currently published modifiers
    pub fn mods(&self) -> u8 {
        self.mods.load(Ordering::Relaxed)
    }

    /// Toggle query that is on while any bit of `mask` is held
    pub const fn query(&self, mask: u8) -> ModifierQuery<'_> {
        ModifierQuery { state: self, mask }
    }
}

/// 1 while any modifier in `mask` is held, else 0
#[derive(Debug, Clone, Copy)]
pub struct ModifierQuery<'a> {
    state: &'a ModifierState,
    mask: u8,
}

impl ModifierQuery<'_> {
    /// Bits this query watches
    pub fn mask(&self) -> u8 {
        self.mask
    }
}

impl StateQuery for ModifierQuery<'_> {
    fn desired_state(&self) -> u8 {
        u8::from(self.state.mods() & self.mask != 0)
    }
}

/// Single published flag (caps lock LED and similar)
#[derive(Debug, Default)]
pub struct FlagQuery {
    on: AtomicBool,
}

impl FlagQuery {
    /// Create cleared
    pub const fn new() -> Self {
        Self {
            on: AtomicBool::new(false),
        }
    }

    /// Publish the flag
    pub fn publish(&self, on: bool) {
        self.on.store(on, Ordering::Relaxed);
    }
}

impl StateQuery for FlagQuery {
    fn desired_state(&self) -> u8 {
        u8::from(self.on.load(Ordering::Relaxed))
    }
}

/// Published words-per-minute value
#[derive(Debug, Default)]
pub struct WpmState {
    wpm: AtomicU16,
}

impl WpmState {
    /// Create at zero
    pub const fn new() -> Self {
        Self {
            wpm: AtomicU16::new(0),
        }
    }

    /// Publish the current typing speed
    pub fn publish(&self, wpm: u16) {
        self.wpm.store(wpm, Ordering::Relaxed);
    }

    /// Current typing speed
    pub fn wpm(&self) -> u16 {
        self.wpm.load(Ordering::Relaxed)
    }

    /// Bucket query over ascending `thresholds`
    pub const fn buckets<'a>(&'a self, thresholds: &'a [u16]) -> WpmBucketQuery<'a> {
        WpmBucketQuery {
            state: self,
            thresholds,
        }
    }
}

/// Typing-speed bucket: the number of thresholds the current WPM has reached
///
/// With thresholds `[20, 50, 80]` a widget gets four states: below 20,
/// 20..50, 50..80 and 80 or more.
#[derive(Debug, Clone, Copy)]
pub struct WpmBucketQuery<'a> {
    state: &'a WpmState,
    thresholds: &'a [u16],
}

impl WpmBucketQuery<'_> {
    /// Bucket for a given speed
    pub fn bucket(&self, wpm: u16) -> u8 {
        let reached = self.thresholds.iter().take_while(|&&limit| wpm >= limit).count();
        reached.min(u8::MAX as usize) as u8
    }

    /// Number of buckets (states) this query produces
    pub fn bucket_count(&self) -> usize {
        self.thresholds.len() + 1
    }
}

impl StateQuery for WpmBucketQuery<'_> {
    fn desired_state(&self) -> u8 {
        self.bucket(self.state.wpm())
    }
}
