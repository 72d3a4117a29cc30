// riscv/list.rs

struct Node {
    key: i32,
    value: i32,
    next: Option<Box<Node>>,
}

/// Singly linked key/value list backing one memory bucket.
///
/// New keys are pushed at the head; updating an existing key keeps its
/// position. Missing keys read as `0`.
#[derive(Default)]
pub struct LinkedList {
    head: Option<Box<Node>>,
    len: usize,
}

impl LinkedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_or_update(&mut self, key: i32, value: i32) {
        let mut cur = self.head.as_deref_mut();
        while let Some(node) = cur {
            if node.key == key {
                node.value = value;
                return;
            }
            cur = node.next.as_deref_mut();
        }
        let next = self.head.take();
        self.head = Some(Box::new(Node { key, value, next }));
        self.len += 1;
    }

    pub fn get(&self, key: i32) -> i32 {
        self.iter()
            .find(|&(k, _)| k == key)
            .map(|(_, v)| v)
            .unwrap_or(0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Walks the list from the head.
    pub fn iter(&self) -> Iter<'_> {
        Iter { next: self.head.as_deref() }
    }
}

impl Drop for LinkedList {
    // iterative, so long buckets don't blow the stack
    fn drop(&mut self) {
        let mut cur = self.head.take();
        while let Some(mut node) = cur {
            cur = node.next.take();
        }
    }
}

pub struct Iter<'a> {
    next: Option<&'a Node>,
}

impl Iterator for Iter<'_> {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            (node.key, node.value)
        })
    }
}
