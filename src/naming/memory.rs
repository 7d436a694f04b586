//! In-memory naming tree. Children keep their bind order.

use hashlink::LinkedHashMap;
use parking_lot::RwLock;

use crate::error::NamingError;
use crate::naming::{segments, Binding, Bound, NamingDirectory};

enum Entry {
    Context(Node),
    Leaf(Bound),
}

enum Target<'a> {
    Root(&'a Node),
    Entry(&'a Entry),
}

struct Node {
    children: LinkedHashMap<String, Entry>,
}

impl Node {
    fn new() -> Self {
        Self {
            children: LinkedHashMap::new(),
        }
    }
}

pub struct InMemoryDirectory {
    root: RwLock<Node>,
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            root: RwLock::new(Node::new()),
        }
    }

    /// Binds `bound` at `path`, creating missing intermediate contexts.
    /// Rebinding an existing leaf replaces it in place.
    pub fn bind(&self, path: &str, bound: Bound) -> Result<(), NamingError> {
        let parts: Vec<&str> = segments(path).collect();
        let Some((leaf, parents)) = parts.split_last() else {
            return Err(NamingError::NotAContext { path: path.to_string() });
        };

        let mut root = self.root.write();
        let parent = Self::descend_or_create(&mut *root, parents, path)?;

        match bound {
            Bound::Context => {
                if !matches!(parent.children.get(*leaf), Some(Entry::Context(_))) {
                    parent.children.insert(leaf.to_string(), Entry::Context(Node::new()));
                }
            }
            other => {
                if let Some(Entry::Context(_)) = parent.children.get(*leaf) {
                    return Err(NamingError::Unavailable(format!(
                        "'{}' is a context and cannot be rebound",
                        path
                    )));
                }
                match parent.children.get_mut(*leaf) {
                    Some(slot) => *slot = Entry::Leaf(other),
                    None => {
                        parent.children.insert(leaf.to_string(), Entry::Leaf(other));
                    }
                }
            }
        }
        Ok(())
    }

    /// Creates an (empty) sub-context, including any missing parents.
    pub fn create_subcontext(&self, path: &str) -> Result<(), NamingError> {
        self.bind(path, Bound::Context)
    }

    fn descend_or_create<'a>(node: &'a mut Node, parts: &[&str], full_path: &str) -> Result<&'a mut Node, NamingError> {
        let mut current = node;
        for part in parts {
            let entry = current
                .children
                .entry(part.to_string())
                .or_insert_with(|| Entry::Context(Node::new()));
            current = match entry {
                Entry::Context(child) => child,
                Entry::Leaf(_) => {
                    return Err(NamingError::NotAContext { path: full_path.to_string() })
                }
            };
        }
        Ok(current)
    }

    fn with_target<T>(&self, path: &str, f: impl FnOnce(Target<'_>) -> Result<T, NamingError>) -> Result<T, NamingError> {
        let root = self.root.read();
        let parts: Vec<&str> = segments(path).collect();
        let Some((leaf, parents)) = parts.split_last() else {
            return f(Target::Root(&*root));
        };

        let mut current: &Node = &*root;
        for part in parents {
            current = match current.children.get(*part) {
                Some(Entry::Context(child)) => child,
                Some(Entry::Leaf(_)) => {
                    return Err(NamingError::NotAContext { path: path.to_string() })
                }
                None => return Err(NamingError::NameNotFound { path: path.to_string() }),
            };
        }
        match current.children.get(*leaf) {
            Some(entry) => f(Target::Entry(entry)),
            None => Err(NamingError::NameNotFound { path: path.to_string() }),
        }
    }
}

impl NamingDirectory for InMemoryDirectory {
    fn lookup(&self, path: &str) -> Result<Bound, NamingError> {
        self.with_target(path, |target| {
            Ok(match target {
                Target::Root(_) | Target::Entry(Entry::Context(_)) => Bound::Context,
                Target::Entry(Entry::Leaf(bound)) => bound.clone(),
            })
        })
    }

    fn list_bindings(&self, path: &str) -> Result<Vec<Binding>, NamingError> {
        self.with_target(path, |target| {
            let node = match target {
                Target::Root(node) | Target::Entry(Entry::Context(node)) => node,
                Target::Entry(Entry::Leaf(_)) => {
                    return Err(NamingError::NotAContext { path: path.to_string() })
                }
            };
            Ok(node
                .children
                .iter()
                .map(|(name, entry)| Binding {
                    name: name.clone(),
                    bound: match entry {
                        Entry::Context(_) => Bound::Context,
                        Entry::Leaf(bound) => bound.clone(),
                    },
                })
                .collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::QueueRef;

    fn names(bindings: &[Binding]) -> Vec<&str> {
        bindings.iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn bind_creates_intermediate_contexts() {
        let dir = InMemoryDirectory::new();
        dir.bind("/jms/sub/Q2", Bound::Queue(QueueRef::new("Q2"))).unwrap();

        assert!(matches!(dir.lookup("jms").unwrap(), Bound::Context));
        assert!(matches!(dir.lookup("/jms/sub").unwrap(), Bound::Context));
        match dir.lookup("jms/sub/Q2").unwrap() {
            Bound::Queue(q) => assert_eq!(q.name(), "Q2"),
            other => panic!("expected queue, got {:?}", other),
        }
    }

    #[test]
    fn root_lookup_is_a_context() {
        let dir = InMemoryDirectory::new();
        assert!(matches!(dir.lookup("").unwrap(), Bound::Context));
        assert!(dir.list_bindings("").unwrap().is_empty());
    }

    #[test]
    fn bindings_keep_bind_order() {
        let dir = InMemoryDirectory::new();
        dir.bind("z", Bound::Topic("z".into())).unwrap();
        dir.bind("a", Bound::Topic("a".into())).unwrap();
        dir.bind("m", Bound::Topic("m".into())).unwrap();
        assert_eq!(names(&dir.list_bindings("/").unwrap()), vec!["z", "a", "m"]);

        // rebinding keeps the original position
        dir.bind("a", Bound::Other("replaced".into())).unwrap();
        assert_eq!(names(&dir.list_bindings("").unwrap()), vec!["z", "a", "m"]);
    }

    #[test]
    fn missing_and_leaf_paths_fail() {
        let dir = InMemoryDirectory::new();
        dir.bind("jms/Q1", Bound::Queue(QueueRef::new("Q1"))).unwrap();

        assert_eq!(
            dir.lookup("jms/nope").unwrap_err(),
            NamingError::NameNotFound { path: "jms/nope".to_string() }
        );
        assert_eq!(
            dir.list_bindings("jms/Q1").unwrap_err(),
            NamingError::NotAContext { path: "jms/Q1".to_string() }
        );
        assert!(dir.bind("jms/Q1/child", Bound::Context).is_err());
    }
}
