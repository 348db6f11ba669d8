//! # FTB Entry Tests
//!
//! Verifies slot queries, the block-span sanity check, construction errors,
//! equality, and branch insertion of multi-slot FTB entries.

use ftbsim_core::common::FrontendError;
use ftbsim_core::config::FtbConfig;
use ftbsim_core::core::units::bru::{BranchSlot, FtbEntry};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::builder::{EntryBuilder, cond, jump};

fn sparse_entry() -> FtbEntry<4> {
    EntryBuilder::<4>::new()
        .tag(0x1000)
        .fallthrough(0x1020)
        .slot(0, cond(0x1000, 0x4000))
        .empty_slot(1, cond(0x1010, 0x5000))
        .slot(2, jump(0x1020, 0x6000))
        .build()
}

// ══════════════════════════════════════════════════════════
// 1. Construction
// ══════════════════════════════════════════════════════════

#[test]
fn new_fills_leading_slots() {
    let entry = FtbEntry::<2>::new(0x40, 1, 0x1010, &[cond(0x1008, 0x3000)]).unwrap();
    assert!(entry.valid);
    assert_eq!(entry.tag, 0x40);
    assert_eq!(entry.tid, 1);
    assert_eq!(entry.valid_slot_num(), 1);
    assert_eq!(entry.slots[0], BranchSlot::from(cond(0x1008, 0x3000)));
    assert!(!entry.slots[1].is_valid());
    assert_eq!(FtbEntry::<2>::SLOTS, 2);
    assert_eq!(entry.slots().len(), 2);
}

#[test]
fn new_rejects_zero_slots() {
    assert_eq!(
        FtbEntry::<0>::new(0, 0, 0x1010, &[]),
        Err(FrontendError::InvalidSlotCount)
    );
}

#[test]
fn new_rejects_too_many_branches() {
    let branches = [cond(0x1000, 0), cond(0x1004, 0), cond(0x1008, 0)];
    assert_eq!(
        FtbEntry::<2>::new(0, 0, 0x1010, &branches),
        Err(FrontendError::TooManyBranches {
            count: 3,
            capacity: 2
        })
    );
}

#[test]
fn default_entry_is_invalid_and_empty() {
    let entry = FtbEntry::<3>::default();
    assert!(!entry.valid);
    assert_eq!(entry.valid_slot_num(), 0);
    assert_eq!(entry.max_span(), 34);
}

#[test]
fn from_config_uses_configured_span() {
    let cfg = FtbConfig { max_block_span: 66 };
    let entry = FtbEntry::<2>::from_config(&cfg, 0, 0, 0x1040, &[]).unwrap();
    assert_eq!(entry.max_span(), 66);
    assert!(entry.is_reasonable(0x1000));
}

// ══════════════════════════════════════════════════════════
// 2. Slot queries
// ══════════════════════════════════════════════════════════

#[test]
fn valid_slot_num_skips_empty_slots() {
    assert_eq!(sparse_entry().valid_slot_num(), 2);
}

#[test]
fn valid_slot_num_before_counts_preceding_branches() {
    let entry = sparse_entry();
    assert_eq!(entry.valid_slot_num_before(0x1000), 0);
    assert_eq!(entry.valid_slot_num_before(0x1004), 1);
    assert_eq!(entry.valid_slot_num_before(0x1018), 1, "Empty slot at 0x1010 is not counted");
    assert_eq!(entry.valid_slot_num_before(0x1024), 2);
}

#[test]
fn slot_idx_ignores_empty_slots() {
    let entry = sparse_entry();
    assert_eq!(entry.slot_idx(0x1010), None);
    assert_eq!(entry.slot_idx(0x1020), Some(2));
    assert_eq!(entry.slot_idx(0x1000), Some(0));
    assert_eq!(entry.slot_idx(0x9999), None);
}

#[test]
fn slot_idx_first_duplicate_wins() {
    let entry = EntryBuilder::<3>::new()
        .slot(0, cond(0x1008, 0x2000))
        .slot(1, cond(0x1008, 0x3000))
        .build();
    assert_eq!(entry.slot_idx(0x1008), Some(0));
}

#[test]
fn slot_accessors_bound_check() {
    let mut entry = sparse_entry();
    assert!(entry.slot(3).is_some());
    assert!(entry.slot(4).is_none());
    entry.slot_mut(0).unwrap().invalidate();
    assert_eq!(entry.valid_slot_num(), 1);
}

// ══════════════════════════════════════════════════════════
// 3. Block span sanity check
// ══════════════════════════════════════════════════════════

#[test]
fn slot_past_span_is_unreasonable() {
    let entry = EntryBuilder::<2>::new()
        .fallthrough(0x1010)
        .slot(0, cond(0x1000 + 36, 0x3000))
        .build();
    assert!(!entry.is_reasonable(0x1000));
}

#[test]
fn slot_at_span_edge_is_reasonable() {
    let entry = EntryBuilder::<2>::new()
        .fallthrough(0x1000 + 20)
        .slot(0, cond(0x1000 + 34, 0x3000))
        .build();
    assert!(entry.is_reasonable(0x1000));
}

#[test]
fn fallthrough_past_span_is_unreasonable() {
    let entry = EntryBuilder::<2>::new().fallthrough(0x1000 + 35).build();
    assert!(!entry.is_reasonable(0x1000));
}

#[test]
fn addresses_at_start_are_unreasonable() {
    let at_start = EntryBuilder::<2>::new()
        .fallthrough(0x1010)
        .slot(0, cond(0x1000, 0x3000))
        .build();
    assert!(!at_start.is_reasonable(0x1000), "Range excludes the start address");

    let behind = EntryBuilder::<2>::new().fallthrough(0x0ff0).build();
    assert!(!behind.is_reasonable(0x1000));
}

#[test]
fn empty_slots_do_not_count_against_span() {
    let entry = EntryBuilder::<2>::new()
        .fallthrough(0x1010)
        .empty_slot(0, cond(0x9000, 0x3000))
        .build();
    assert!(entry.is_reasonable(0x1000));
}

#[test]
fn span_is_configurable() {
    let entry = EntryBuilder::<2>::new()
        .fallthrough(0x1040)
        .max_span(64)
        .build();
    assert!(entry.is_reasonable(0x1000));
    assert!(!entry.clone().with_max_span(34).is_reasonable(0x1000));
}

#[test]
fn span_saturates_near_top_of_address_space() {
    let entry = EntryBuilder::<2>::new().fallthrough(u64::MAX).build();
    assert!(entry.is_reasonable(u64::MAX - 10));
}

// ══════════════════════════════════════════════════════════
// 4. Equality and copies
// ══════════════════════════════════════════════════════════

#[test]
fn equality_ignores_tag_and_thread() {
    let a = sparse_entry();
    let mut b = sparse_entry();
    b.tag = 0xdead;
    b.tid = 3;
    assert_eq!(a, b);
    assert!(!a.same_identity(&b));
}

#[test]
fn equality_compares_slot_contents() {
    let a = sparse_entry();
    let mut b = sparse_entry();
    b.slots[0].unset_always_taken();
    assert_ne!(a, b);

    let mut c = sparse_entry();
    c.fallthrough_pc += 4;
    assert_ne!(a, c);
}

#[test]
fn clone_is_deep() {
    let original = sparse_entry();
    let mut copy = original.clone();
    copy.slots[2].invalidate();
    copy.fallthrough_pc = 0;
    assert!(original.slots[2].is_valid());
    assert_eq!(original.fallthrough_pc, 0x1020);
}

// ══════════════════════════════════════════════════════════
// 5. Branch insertion
// ══════════════════════════════════════════════════════════

#[test]
fn insert_keeps_slots_sorted() {
    let mut entry = EntryBuilder::<3>::new()
        .fallthrough(0x1020)
        .slot(0, cond(0x1010, 0x3000))
        .build();
    assert!(entry.insert_branch(cond(0x1004, 0x2000)));
    assert!(entry.insert_branch(jump(0x1018, 0x4000)));

    let pcs: Vec<u64> = entry.valid_slots().map(BranchSlot::pc).collect();
    assert_eq!(pcs, vec![0x1004, 0x1010, 0x1018]);
}

#[test]
fn insert_existing_branch_is_a_no_op() {
    let mut entry = sparse_entry();
    entry.slots[0].unset_always_taken();
    let before = entry.clone();
    assert!(entry.insert_branch(cond(0x1000, 0x7777)));
    assert_eq!(entry, before);
}

#[test]
fn insert_into_full_entry_fails() {
    let mut entry = FtbEntry::<2>::new(0, 0, 0x1020, &[cond(0x1004, 0), cond(0x1008, 0)]).unwrap();
    let before = entry.clone();
    assert!(!entry.insert_branch(cond(0x100c, 0)));
    assert_eq!(entry, before);
}

proptest! {
    #[test]
    fn insertion_never_exceeds_capacity(offsets in proptest::collection::vec(1u64..34, 0..10)) {
        let mut entry = EntryBuilder::<4>::new().fallthrough(0x1022).build();
        for off in &offsets {
            let _ = entry.insert_branch(cond(0x1000 + off, 0x8000));
        }
        let pcs: Vec<u64> = entry.valid_slots().map(BranchSlot::pc).collect();
        prop_assert!(pcs.len() <= 4);
        prop_assert!(pcs.windows(2).all(|w| w[0] < w[1]), "slots out of order: {:?}", pcs);
        prop_assert!(entry.is_reasonable(0x1000));
    }
}
