use crate::spec::PathSpec;
use colored::Colorize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Represents a node in the tree (either file or directory).
#[derive(Debug)]
struct TreeNode {
    name: String,
    children: Vec<Rc<RefCell<TreeNode>>>,
    is_file: bool,
}
impl TreeNode {
    fn new(name: String, is_file: bool) -> Self {
        Self {
            name,
            children: Vec::new(),
            is_file,
        }
    }
}

/// Build the layout tree from classified specs, returning the root node.
///
/// Parents that no spec names are added as directories. A spec naming an already known path
/// replaces that node's kind, the way a later spec replaces an earlier entry on disk.
fn build_tree(specs: &[PathSpec], root_name: &str) -> Rc<RefCell<TreeNode>> {
    let root = Rc::new(RefCell::new(TreeNode::new(root_name.to_string(), false)));

    // map relative path to node
    let mut lookup: HashMap<PathBuf, Rc<RefCell<TreeNode>>> = HashMap::new();
    lookup.insert(PathBuf::new(), Rc::clone(&root));

    for spec in specs {
        let is_file = matches!(spec, PathSpec::File(_));

        let mut current = PathBuf::new();
        let mut parent = Rc::clone(&root);
        let segments: Vec<_> = spec.path().iter().collect();

        for (index, segment) in segments.iter().enumerate() {
            current.push(segment);
            let is_leaf = index == segments.len() - 1;

            let node = match lookup.get(&current) {
                Some(node) => Rc::clone(node),
                None => {
                    let node = Rc::new(RefCell::new(TreeNode::new(
                        segment.to_string_lossy().to_string(),
                        is_leaf && is_file,
                    )));
                    parent.borrow_mut().children.push(Rc::clone(&node));
                    lookup.insert(current.clone(), Rc::clone(&node));
                    node
                }
            };

            node.borrow_mut().is_file = is_leaf && is_file;

            parent = node;
        }
    }

    root
}

/// Print the tree with a nice ASCII style.
fn print_tree(node: &Rc<RefCell<TreeNode>>, prefix: &str, is_last: bool) {
    let node_borrow = node.borrow();

    let connector = if is_last {
        "└── ".yellow()
    } else {
        "├── ".yellow()
    };
    let name = if node_borrow.is_file {
        node_borrow.name.green()
    } else {
        node_borrow.name.blue()
    };
    println!("{}{}{}", prefix.yellow(), connector, name);

    let child_prefix = if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    };

    let len = node_borrow.children.len();
    for (i, child) in node_borrow.children.iter().enumerate() {
        let last = i == len - 1;
        print_tree(child, &child_prefix, last);
    }
}

pub fn preview_as_tree(specs: &[PathSpec], root: &Path) {
    let root_name = root
        .file_name()
        .map(|os| os.to_string_lossy().to_string())
        .unwrap_or_else(|| root.display().to_string());

    let tree_root = build_tree(specs, &root_name);

    println!(
        "Legend: {} = (directory), {} = (file)",
        "blue".blue(),
        "green".green()
    );

    print_tree(&tree_root, "", true);
}
