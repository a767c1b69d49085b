//! Property-based tests for access path comparison and re-rooting

use proptest::prelude::*;
use rlockcheck::features::lock_analysis::domain::{AccessPath, PathNode};
use rlockcheck::features::syntax::domain::SymbolId;
use rlockcheck::shared::models::Span;

// Symbols drawn from a small pool so collisions actually happen
fn symbols(min: usize) -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..6, min..7)
}

fn path_of(ids: &[u32]) -> AccessPath {
    AccessPath::new(
        ids.iter()
            .map(|id| PathNode::new(format!("n{id}"), SymbolId(*id), Span::zero()))
            .collect(),
    )
    .expect("non-empty ids")
}

proptest! {
    #[test]
    fn equal_is_reflexive_for_any_offset(ids in symbols(1), offset in 0usize..8) {
        let p = path_of(&ids);
        prop_assert!(p.equal(&p, offset));
    }

    #[test]
    fn equal_is_symmetric(a in symbols(1), b in symbols(1), offset in 0usize..3) {
        let (pa, pb) = (path_of(&a), path_of(&b));
        prop_assert_eq!(pa.equal(&pb, offset), pb.equal(&pa, offset));
    }

    #[test]
    fn equal_ignores_only_the_trailing_nodes(ids in symbols(2), replacement in 100u32..200) {
        let p = path_of(&ids);
        let mut changed = ids.clone();
        *changed.last_mut().unwrap() = replacement;
        let q = path_of(&changed);
        prop_assert!(!p.equal(&q, 0));
        prop_assert!(p.equal(&q, 1));
    }

    #[test]
    fn paths_of_different_length_never_equal(a in symbols(1), extra in 0u32..6) {
        let mut longer = a.clone();
        longer.push(extra);
        prop_assert!(!path_of(&a).equal(&path_of(&longer), 0));
        prop_assert!(!path_of(&a).equal(&path_of(&longer), 1));
    }

    #[test]
    fn strip_prefix_keeps_the_junction_node(ids in symbols(2), cut in 1usize..6) {
        let p = path_of(&ids);
        prop_assume!(cut < ids.len());
        let rest = p.strip_prefix(&p.nodes()[..cut]).expect("own prefix strips");
        prop_assert_eq!(rest.len(), ids.len() - cut + 1);
        prop_assert_eq!(rest.root().symbol, SymbolId(ids[cut - 1]));
        prop_assert_eq!(rest.last().symbol, p.last().symbol);
    }

    #[test]
    fn strip_prefix_rejects_whole_path(ids in symbols(1)) {
        let p = path_of(&ids);
        prop_assert!(p.strip_prefix(p.nodes()).is_none());
        prop_assert!(p.strip_prefix(&[]).is_none());
    }

    #[test]
    fn suffix_then_with_root_renames_receiver(tail in symbols(1), method in 50u32..60, param in 70u32..80) {
        // lock = [recv, tail..], call = [recv, method]
        let mut lock_ids = vec![10];
        lock_ids.extend(&tail);
        let lock = path_of(&lock_ids);
        let call = path_of(&[10, method]);

        let carried = lock.suffix(&call).expect("receiver prefixes the lock");
        let rooted = carried.with_root(PathNode::new("p", SymbolId(param), Span::zero()));
        prop_assert_eq!(rooted.len(), lock.len());
        prop_assert_eq!(rooted.root().symbol, SymbolId(param));
        prop_assert_eq!(&rooted.nodes()[1..].iter().map(|n| n.symbol).collect::<Vec<_>>(),
            &lock.nodes()[1..].iter().map(|n| n.symbol).collect::<Vec<_>>());
    }

    #[test]
    fn suffix_requires_matching_receiver(tail in symbols(1), other_root in 20u32..30) {
        let mut lock_ids = vec![10];
        lock_ids.extend(&tail);
        let lock = path_of(&lock_ids);
        let call = path_of(&[other_root, 99]);
        prop_assert!(lock.suffix(&call).is_none());
    }
}
