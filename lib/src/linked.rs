use std::cmp::Ordering;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::{
    Color, KeyCompare, NodeLabel, NodeOrd, NodeRead, NodeWrite, Path, Side,
    TreeReadOperations, TreeWriteOperations,
};

pub type Link<K> = Option<NonNull<LinkedNode<K>>>;

/// Node for trees built out of pointers. Where the node lives is up to the
/// caller: a `Vec`, a pinned box, a slot inside a larger struct.
#[derive(Debug)]
pub struct LinkedNode<K> {
    links: [Link<K>; 2],
    color: Color,
    key: K,
}

impl<K> LinkedNode<K> {
    pub fn new(key: K) -> Self {
        LinkedNode {
            links: [None, None],
            color: Color::Black,
            key,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// Accessor that lets the engine follow raw node pointers. It owns nothing.
pub struct LinkedStore<K> {
    phantom: PhantomData<*mut LinkedNode<K>>,
}

impl<K: Ord> LinkedStore<K> {
    /// # Safety
    ///
    /// Every non-null link handed to, or reachable from a guard handed to,
    /// this store must point to a live `LinkedNode<K>`, and no other
    /// reference to those nodes may be used while the store is.
    pub unsafe fn new() -> Self {
        LinkedStore {
            phantom: PhantomData,
        }
    }

    fn get(&self, node: Link<K>) -> &LinkedNode<K> {
        let Some(ptr) = node else {
            panic!("null link dereferenced");
        };
        // SAFETY: liveness and exclusivity are the contract of `new`.
        unsafe { ptr.as_ref() }
    }

    fn get_mut(&mut self, node: Link<K>) -> &mut LinkedNode<K> {
        let Some(mut ptr) = node else {
            panic!("null link dereferenced");
        };
        // SAFETY: liveness and exclusivity are the contract of `new`.
        unsafe { ptr.as_mut() }
    }

    pub fn key(&self, node: Link<K>) -> &K {
        &self.get(node).key
    }

    /// Link node under guard. Returns false when an equal key is present.
    pub fn insert(&mut self, guard: Link<K>, node: Link<K>) -> bool {
        let mut path: Path<Link<K>> = Path::new();
        let key: &K = &self.get(node).key;
        if self.search(&mut path, guard, key).is_found() {
            return false;
        }
        TreeWriteOperations::insert(self, &path, node);
        true
    }

    /// Unlink the node holding key. NULL when absent.
    pub fn remove(&mut self, guard: Link<K>, key: &K) -> Link<K> {
        let mut path: Path<Link<K>> = Path::new();
        if !self.search(&mut path, guard, key).is_found() {
            return None;
        }
        self.delete(&mut path)
    }

    pub fn find(&self, guard: Link<K>, key: &K) -> Link<K> {
        let mut path: Path<Link<K>> = Path::new();
        if self.search(&mut path, guard, key).is_found() {
            path.current()
        } else {
            None
        }
    }
}

impl<K: Ord> NodeRead for LinkedStore<K> {
    type Ref = Link<K>;

    fn child(&self, node: Link<K>, side: Side) -> Link<K> {
        self.get(node).links[side.slot()]
    }

    fn color(&self, node: Link<K>) -> Color {
        self.get(node).color
    }
}

impl<K: Ord> NodeWrite for LinkedStore<K> {
    fn set_child(&mut self, node: Link<K>, side: Side, child: Link<K>) {
        self.get_mut(node).links[side.slot()] = child;
    }

    fn set_color(&mut self, node: Link<K>, color: Color) {
        self.get_mut(node).color = color;
    }
}

impl<K: Ord> KeyCompare<K> for LinkedStore<K> {
    fn compare(&self, key: &K, node: Link<K>) -> Ordering {
        key.cmp(&self.get(node).key)
    }
}

impl<K: Ord> NodeOrd for LinkedStore<K> {
    fn cmp_nodes(&self, a: Link<K>, b: Link<K>) -> Ordering {
        self.get(a).key.cmp(&self.get(b).key)
    }
}

impl<K: Ord + Debug> NodeLabel for LinkedStore<K> {
    fn fmt_label(&self, node: Link<K>, out: &mut dyn std::fmt::Write) -> std::fmt::Result {
        write!(out, "{:?}", self.get(node).key)
    }
}
