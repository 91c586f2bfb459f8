// typed indices into a Vec, so NFA and DFA state indices can't be mixed up
#[macro_export]
macro_rules! make_type_idx {
    ($type_idx_name:tt, $type_name:tt) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub(crate) struct $type_idx_name(u32);

        impl $type_idx_name {
            pub(crate) fn new(idx: usize) -> $type_idx_name {
                $type_idx_name(idx as u32)
            }

            pub(crate) fn from_push(vec: &mut Vec<$type_name>, val: $type_name) -> $type_idx_name {
                let idx = $type_idx_name(vec.len() as u32);
                vec.push(val);
                idx
            }

            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::ops::Index<$type_idx_name> for [$type_name] {
            type Output = $type_name;

            fn index(&self, index: $type_idx_name) -> &Self::Output {
                &self[index.0 as usize]
            }
        }

        impl std::ops::IndexMut<$type_idx_name> for [$type_name] {
            fn index_mut(&mut self, index: $type_idx_name) -> &mut Self::Output {
                &mut self[index.0 as usize]
            }
        }

        impl std::ops::Index<$type_idx_name> for Vec<$type_name> {
            type Output = $type_name;

            fn index(&self, index: $type_idx_name) -> &Self::Output {
                &self.as_slice()[index]
            }
        }

        impl std::ops::IndexMut<$type_idx_name> for Vec<$type_name> {
            fn index_mut(&mut self, index: $type_idx_name) -> &mut Self::Output {
                &mut self.as_mut_slice()[index]
            }
        }
    };
}

#[cfg(test)]
mod tests {
    #[derive(Debug, PartialEq)]
    pub(crate) struct Node(&'static str);

    make_type_idx!(NodeIdx, Node);

    #[test]
    fn push_and_index() {
        let mut nodes: Vec<Node> = Vec::new();
        let a = NodeIdx::from_push(&mut nodes, Node("a"));
        let b = NodeIdx::from_push(&mut nodes, Node("b"));

        assert_eq!(a.index(), 0);
        assert_eq!(b, NodeIdx::new(1));
        assert_eq!(nodes[b], Node("b"));

        nodes[a] = Node("c");
        assert_eq!(nodes.as_slice()[a], Node("c"));
    }
}
