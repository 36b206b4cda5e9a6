//! Field layouts of the native savegame header, per family and version
//!
//! Every supported `(family, version)` pair resolves to exactly one
//! [`HeaderLayout`] through [`LAYOUTS`]; the header decoder only follows the
//! layout and never branches on the version itself.

use std::ops::RangeInclusive;

use super::family::GameFamily;

/// Length of the fixed description field in early versions
pub const FIXED_DESCRIPTION_LEN: usize = 24;

/// How the user description is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionEncoding {
    /// NUL padded field of the given length
    Fixed(usize),
    /// 4-byte length followed by the text
    LengthPrefixed,
}

/// How the skill byte is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillEncoding {
    /// Low 7 bits skill, high bit "fast"
    PackedFast,
    /// Low 7 bits skill, high bit ignored
    SkillOnly,
}

/// Placement of the ACS script state segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptSegment {
    /// No script state in this family
    Absent,
    /// Unmarked, fixed sub-version 1, followed by 12 bytes of padding
    Legacy,
    /// Preceded by a segment id and a sub-version byte
    Marked,
}

/// Decode strategy for one `(family, version)` cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLayout {
    pub description: DescriptionEncoding,
    pub skill: SkillEncoding,
    /// A separate "fast" byte follows `deathmatch`
    pub standalone_fast: bool,
    /// `randomClasses` instead of `respawnMonsters`
    pub random_classes: bool,
    /// Two bytes of struct padding before `mapTime`
    pub struct_padding: bool,
    /// `mapTime` and the player presence array are stored in the header
    pub player_tail: bool,
    pub script: ScriptSegment,
}

/// Which families a layout rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FamilyClass {
    /// Doom and Heretic
    Classic,
    /// Hexen
    Scripting,
}

struct LayoutRule {
    class: FamilyClass,
    versions: RangeInclusive<i32>,
    layout: HeaderLayout,
}

const CLASSIC_V0: HeaderLayout = HeaderLayout {
    description: DescriptionEncoding::Fixed(FIXED_DESCRIPTION_LEN),
    skill: SkillEncoding::PackedFast,
    standalone_fast: false,
    random_classes: false,
    struct_padding: true,
    player_tail: true,
    script: ScriptSegment::Absent,
};

const CLASSIC_V10: HeaderLayout = HeaderLayout {
    description: DescriptionEncoding::LengthPrefixed,
    struct_padding: false,
    ..CLASSIC_V0
};

const CLASSIC_V13: HeaderLayout = HeaderLayout {
    skill: SkillEncoding::SkillOnly,
    standalone_fast: true,
    ..CLASSIC_V10
};

const HEXEN_V0: HeaderLayout = HeaderLayout {
    description: DescriptionEncoding::Fixed(FIXED_DESCRIPTION_LEN),
    skill: SkillEncoding::SkillOnly,
    standalone_fast: false,
    random_classes: true,
    struct_padding: false,
    player_tail: false,
    script: ScriptSegment::Legacy,
};

const HEXEN_V7: HeaderLayout = HeaderLayout {
    script: ScriptSegment::Marked,
    ..HEXEN_V0
};

const HEXEN_V10: HeaderLayout = HeaderLayout {
    description: DescriptionEncoding::LengthPrefixed,
    ..HEXEN_V7
};

/// All known layouts
const LAYOUTS: &[LayoutRule] = &[
    LayoutRule { class: FamilyClass::Classic, versions: 0..=9, layout: CLASSIC_V0 },
    LayoutRule { class: FamilyClass::Classic, versions: 10..=12, layout: CLASSIC_V10 },
    LayoutRule { class: FamilyClass::Classic, versions: 13..=13, layout: CLASSIC_V13 },
    LayoutRule { class: FamilyClass::Scripting, versions: 0..=6, layout: HEXEN_V0 },
    LayoutRule { class: FamilyClass::Scripting, versions: 7..=9, layout: HEXEN_V7 },
    LayoutRule { class: FamilyClass::Scripting, versions: 10..=13, layout: HEXEN_V10 },
];

impl HeaderLayout {
    /// Find the layout for a family and version
    ///
    /// Returns `None` for versions outside every rule.
    #[must_use]
    pub fn select(family: GameFamily, version: i32) -> Option<HeaderLayout> {
        let class = if family.has_scripting() {
            FamilyClass::Scripting
        } else {
            FamilyClass::Classic
        };
        LAYOUTS
            .iter()
            .find(|rule| rule.class == class && rule.versions.contains(&version))
            .map(|rule| rule.layout)
    }
}
