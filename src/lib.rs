//! Binary search trees sharing one node model: a plain unbalanced tree,
//! an AVL tree and a red-black tree.
//!
//! All three are the same [`Tree`] type, differing only in the [`Balance`]
//! strategy run after each insertion and removal.
//!
//! ```
//! use bst::AvlTree;
//!
//! let mut tree = AvlTree::new("");
//! for key in [3, 1, 2] {
//!     tree.add_or_update_node(key, "value");
//! }
//! assert_eq!(tree.structure().to_string(), "2:ROOT/1:2/3:2");
//! assert_eq!(tree.get_node_value(&4), "");
//! ```

#[cfg_attr(feature = "unchecked", path = "shared_unchecked.rs")]
#[cfg_attr(not(feature = "unchecked"), path = "shared_checked.rs")]
mod shared;

mod avl;
mod balance;
mod cursor;
mod error;
mod node;
mod red_black;
mod structure;
mod tree;

pub use avl::Avl;
pub use balance::{Balance, Plain};
pub use cursor::{Cursor, CursorMut, Iter};
pub use error::{MergeError, Violation};
pub use node::Color;
pub use red_black::RedBlack;
pub use structure::Structure;
pub use tree::Tree;

pub type BinarySearchTree<K, V> = Tree<K, V, Plain>;
pub type AvlTree<K, V> = Tree<K, V, Avl>;
pub type RedBlackTree<K, V> = Tree<K, V, RedBlack>;

#[cfg(test)]
mod tests {
    use rand::seq::SliceRandom;
    use rand::Rng;

    use super::*;

    const NULL: u32 = u32::MAX;

    /// Routes the rebalancing `debug!` output into the test harness.
    pub(crate) fn init_logging() {
        use simplelog::{Config, LevelFilter, TestLogger};
        let _ = TestLogger::init(LevelFilter::Debug, Config::default());
    }

    fn std_compare<B: Balance>() {
        let mut m1 = std::collections::BTreeMap::new();
        let mut m2: Tree<u16, u32, B> = Tree::new(NULL);

        let nums: Vec<u16> = std::iter::repeat_with(rand::random)
            .take(1024 * 16)
            .collect();

        for &n in &nums {
            assert_eq!(m1.insert(n, n as u32).is_none(), m2.add_or_update_node(n, n as u32));
        }
        assert_eq!(m1.len(), m2.len());
        for &n in &nums {
            let next = n.wrapping_add(1);
            assert_eq!(m1.get(&n).copied().unwrap_or(NULL), m2.get_node_value(&n));
            assert_eq!(m1.get(&next).copied().unwrap_or(NULL), m2.get_node_value(&next));
        }
        assert!(m1.iter().map(|(&k, &v)| (k, v)).eq(m2.iter()));
        assert_eq!(m2.validate(), Ok(()));

        for &n in &nums {
            assert_eq!(m1.remove(&n).is_some(), m2.remove_node(&n));
        }
        assert!(m2.is_empty());
        assert_eq!(m2.validate(), Ok(()));
    }

    fn random_tree<B: Balance>(rng: &mut impl Rng) -> (Tree<i32, u32, B>, Vec<i32>) {
        let mut keys: Vec<i32> = (-500..500).collect();
        keys.shuffle(rng);
        keys.truncate(rng.gen_range(0..200));

        let mut tree = Tree::new(0);
        for &key in &keys {
            tree.add_or_update_node(key, key.unsigned_abs() + 1);
        }
        (tree, keys)
    }

    fn sizes_agree<B: Balance>() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let (mut tree, mut keys) = random_tree::<B>(&mut rng);
            keys.shuffle(&mut rng);
            for key in keys.iter().take(keys.len() / 3) {
                tree.remove_node(key);
            }

            assert_eq!(tree.len(), tree.level_order().len());
            assert_eq!(tree.len(), tree.iter().count());
            assert!(tree.iter().zip(tree.iter().skip(1)).all(|(a, b)| a.0 < b.0));
            assert_eq!(tree.validate(), Ok(()));
        }
    }

    fn idempotent_update<B: Balance>() {
        let mut rng = rand::thread_rng();
        let (mut tree, keys) = random_tree::<B>(&mut rng);
        let key = 1000;
        assert!(!keys.contains(&key));

        assert!(tree.add_or_update_node(key, 7));
        let first = tree.structure().to_string();
        assert!(!tree.add_or_update_node(key, 7));
        assert_eq!(tree.structure().to_string(), first);
        assert_eq!(tree.get_node_value(&key), 7);
    }

    fn insert_then_remove<B: Balance>() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let (mut tree, _) = random_tree::<B>(&mut rng);
            let before: Vec<_> = tree.iter().collect();
            let size = tree.len();

            let key = rng.gen_range(500..600);
            assert!(tree.add_or_update_node(key, 1));
            assert!(tree.remove_node(&key));

            assert_eq!(tree.len(), size);
            assert!(tree.iter().eq(before));
            assert_eq!(tree.validate(), Ok(()));
        }
    }

    fn merge_scenario<B: Balance>() {
        init_logging();
        let target_keys = [10, 5, 15, 3, 7, 12, 18, 1];
        let source_keys = [2, 4, 6, 8, 11, 13, 16, 19, 20];

        let mut target: Tree<i32, &str, B> = Tree::new("");
        target.extend(target_keys.iter().map(|&key| (key, "target")));
        let mut source: Tree<i32, &str, B> = Tree::new("");
        source.extend(source_keys.iter().map(|&key| (key, "source")));

        let mut expected: Tree<i32, &str, B> = Tree::new("");
        expected.extend(target_keys.iter().map(|&key| (key, "target")));
        expected.extend(source.level_order());

        target.merge_tree(&mut source).unwrap();
        assert_eq!(target.len(), 17);
        assert_eq!(source.len(), 0);
        assert!(source.iter().next().is_none());
        assert!(target == expected);
        assert_eq!(target.validate(), Ok(()));
    }

    macro_rules! strategy_tests {
        ($($name:ident => $balance:ty),* $(,)?) => {
            $(
                paste::paste! {
                    #[test]
                    fn [<std_compare_ $name>]() {
                        std_compare::<$balance>();
                    }

                    #[test]
                    fn [<sizes_agree_ $name>]() {
                        sizes_agree::<$balance>();
                    }

                    #[test]
                    fn [<idempotent_update_ $name>]() {
                        idempotent_update::<$balance>();
                    }

                    #[test]
                    fn [<insert_then_remove_ $name>]() {
                        insert_then_remove::<$balance>();
                    }

                    #[test]
                    fn [<merge_scenario_ $name>]() {
                        merge_scenario::<$balance>();
                    }
                }
            )*
        };
    }

    strategy_tests! {
        plain => Plain,
        avl => Avl,
        red_black => RedBlack,
    }

    #[test]
    fn equality_ignores_strategy() {
        let keys = [4, 2, 6, 1, 3, 5, 7];
        let mut plain = BinarySearchTree::new(0);
        let mut avl = AvlTree::new(0);
        let mut red_black = RedBlackTree::new(0);
        for key in keys {
            plain.add_or_update_node(key, key * 3);
            avl.add_or_update_node(key, key * 3);
            red_black.add_or_update_node(key, key * 3);
        }

        assert!(plain == avl);
        assert!(avl == red_black);
        assert!(red_black == plain);

        red_black.add_or_update_node(7, 0xbad);
        assert!(avl != red_black);
    }
}
