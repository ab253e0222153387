//! Register bins, the address map, and the bin packer that produces both.
//! Packing is a pure function of the declared `(name, width)` set: names are
//! sorted before allocation, so declaration order never leaks into addresses.

use std::ops::Range;

use ahash::AHashMap;
use smallvec::SmallVec;

use super::error::{ConfigError, ConfigResult};

/// One field's placement inside its bin: the `[lo, hi)` bit range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinMember {
    pub name: String,
    pub lo: u32,
    pub hi: u32,
}

impl BinMember {
    pub fn width(&self) -> u32 {
        self.hi - self.lo
    }
}

/// A fixed-width addressable register holding one or more packed fields.
///
/// `index` is the register's address on the shared config bus. Member ranges
/// are contiguous from bit 0, so `width` equals the last member's `hi`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterBin {
    pub index: u32,
    pub width: u32,
    pub members: SmallVec<[BinMember; 4]>,
}

/// Address-map entry: which bin a field landed in and where.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSlot {
    pub bin: u32,
    pub lo: u32,
    pub hi: u32,
}

impl FieldSlot {
    pub fn width(&self) -> u32 {
        self.hi - self.lo
    }

    pub fn bit_range(&self) -> Range<u32> {
        self.lo..self.hi
    }
}

/// Finalized allocation: the ordered bins plus the field-name address map.
/// Built once by [`Layout::pack`] and read-only afterwards.
#[derive(Debug, Default)]
pub struct Layout {
    bins: Vec<RegisterBin>,
    map: AHashMap<String, FieldSlot>,
}

impl Layout {
    /// First-fit word-boundary packing over lexicographically sorted names.
    ///
    /// A field that would cross the `data_width` boundary closes the current
    /// bin and opens the next; no field ever spans two bins. Bin indices are
    /// assigned densely in emission order.
    pub fn pack(mut fields: Vec<(String, u32)>, data_width: u32) -> ConfigResult<Self> {
        fields.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let mut layout = Layout::default();
        let mut offset = 0u32;
        let mut working: SmallVec<[BinMember; 4]> = SmallVec::new();

        for (name, width) in fields {
            if width > data_width {
                return Err(ConfigError::FieldTooWide {
                    name,
                    width,
                    data_width,
                });
            }
            if offset + width > data_width {
                layout.close_bin(&mut working);
                offset = 0;
            }
            working.push(BinMember {
                name,
                lo: offset,
                hi: offset + width,
            });
            offset += width;
        }
        if !working.is_empty() {
            layout.close_bin(&mut working);
        }

        Ok(layout)
    }

    fn close_bin(&mut self, working: &mut SmallVec<[BinMember; 4]>) {
        let index = self.bins.len() as u32;
        let width = working.last().map(|member| member.hi).unwrap_or(0);
        let members = std::mem::take(working);
        for member in &members {
            self.map.insert(
                member.name.clone(),
                FieldSlot {
                    bin: index,
                    lo: member.lo,
                    hi: member.hi,
                },
            );
        }
        self.bins.push(RegisterBin {
            index,
            width,
            members,
        });
    }

    pub fn bins(&self) -> &[RegisterBin] {
        &self.bins
    }

    pub fn num_bins(&self) -> usize {
        self.bins.len()
    }

    pub fn num_fields(&self) -> usize {
        self.map.len()
    }

    pub fn slot(&self, name: &str) -> ConfigResult<FieldSlot> {
        self.map
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::UnknownField { name: name.into() })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(fields: &[(&str, u32)], data_width: u32) -> Layout {
        let owned = fields
            .iter()
            .map(|(name, width)| (name.to_string(), *width))
            .collect();
        Layout::pack(owned, data_width).expect("pack should succeed")
    }

    #[test]
    fn two_fields_share_one_bin() {
        let layout = pack(&[("a", 4), ("b", 4)], 8);
        assert_eq!(layout.num_bins(), 1, "4+4 fits a single 8-bit bin");
        let bin = &layout.bins()[0];
        assert_eq!(bin.width, 8, "bin width is the last member's hi bound");
        assert_eq!(
            layout.slot("a").expect("slot a"),
            FieldSlot { bin: 0, lo: 0, hi: 4 }
        );
        assert_eq!(
            layout.slot("b").expect("slot b"),
            FieldSlot { bin: 0, lo: 4, hi: 8 }
        );
    }

    #[test]
    fn overflow_at_word_boundary_opens_a_new_bin() {
        let layout = pack(&[("a", 5), ("b", 5)], 8);
        assert_eq!(layout.num_bins(), 2, "second 5-bit field cannot fit bit 5..10");
        assert_eq!(
            layout.slot("a").expect("slot a"),
            FieldSlot { bin: 0, lo: 0, hi: 5 }
        );
        assert_eq!(
            layout.slot("b").expect("slot b"),
            FieldSlot { bin: 1, lo: 0, hi: 5 },
            "field b restarts at bit 0 of the next bin"
        );
        assert_eq!(layout.bins()[0].width, 5, "partially filled bin keeps its true width");
    }

    #[test]
    fn packing_is_ordered_by_name_not_declaration() {
        let forward = pack(&[("alpha", 3), ("beta", 3), ("gamma", 3)], 8);
        let reverse = pack(&[("gamma", 3), ("beta", 3), ("alpha", 3)], 8);
        assert_eq!(
            forward.bins(),
            reverse.bins(),
            "layout must be a pure function of the field set"
        );
        for name in ["alpha", "beta", "gamma"] {
            assert_eq!(
                forward.slot(name).expect("forward slot"),
                reverse.slot(name).expect("reverse slot"),
                "slot for '{name}' should not depend on declaration order"
            );
        }
    }

    #[test]
    fn member_ranges_partition_each_bin() {
        let layout = pack(
            &[("a", 7), ("b", 2), ("c", 9), ("d", 16), ("e", 1), ("f", 30)],
            32,
        );
        for bin in layout.bins() {
            let mut expected_lo = 0;
            for member in &bin.members {
                assert_eq!(
                    member.lo, expected_lo,
                    "members of bin {} must be contiguous from bit 0",
                    bin.index
                );
                assert!(member.hi > member.lo, "members carry positive width");
                expected_lo = member.hi;
            }
            assert_eq!(
                expected_lo, bin.width,
                "bin {} width must equal the packed extent",
                bin.index
            );
            assert!(bin.width <= 32, "no bin may exceed the data width");
        }
    }

    #[test]
    fn bin_indices_are_dense() {
        let layout = pack(&[("a", 8), ("b", 8), ("c", 8), ("d", 8)], 8);
        let indices: Vec<u32> = layout.bins().iter().map(|bin| bin.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3], "addresses are 0..N with no gaps");
    }

    #[test]
    fn every_field_lands_in_exactly_one_bin() {
        let fields = [("a", 3), ("b", 14), ("c", 6), ("d", 9), ("e", 2)];
        let layout = pack(&fields, 16);
        assert_eq!(layout.num_fields(), fields.len());
        for (name, width) in fields {
            let slot = layout.slot(name).expect("every declared field resolves");
            assert_eq!(slot.width(), width, "slot for '{name}' keeps its width");
            let bin = &layout.bins()[slot.bin as usize];
            let occurrences = layout
                .bins()
                .iter()
                .flat_map(|bin| &bin.members)
                .filter(|member| member.name == name)
                .count();
            assert_eq!(occurrences, 1, "'{name}' must appear in exactly one bin");
            assert!(
                bin.members
                    .iter()
                    .any(|member| member.name == name && member.lo == slot.lo),
                "address map and bin membership must agree for '{name}'"
            );
        }
    }

    #[test]
    fn oversized_field_fails_packing() {
        let err = Layout::pack(vec![("x".to_string(), 40)], 32);
        assert!(
            matches!(err, Err(ConfigError::FieldTooWide { width: 40, .. })),
            "a field can never span bins"
        );
    }

    #[test]
    fn empty_field_set_yields_empty_layout() {
        let layout = Layout::pack(Vec::new(), 32).expect("empty pack");
        assert_eq!(layout.num_bins(), 0);
        assert!(
            matches!(layout.slot("anything"), Err(ConfigError::UnknownField { .. })),
            "lookups against an empty layout fail"
        );
    }

    #[test]
    fn exact_fit_field_does_not_split() {
        let layout = pack(&[("wide", 32), ("bit", 1)], 32);
        assert_eq!(layout.num_bins(), 2);
        assert_eq!(layout.slot("bit").expect("slot bit").bin, 0, "'bit' sorts first");
        assert_eq!(
            layout.slot("wide").expect("slot wide"),
            FieldSlot { bin: 1, lo: 0, hi: 32 },
            "a full-width field occupies its own bin"
        );
    }
}
