use growing_tree::Tree;
use tracing_subscriber::EnvFilter;

const SUPERSET: [u8; 4] = [0, 1, 2, 3];

/// Every node gets a child for each element of the superset it does not contain yet.
#[allow(clippy::ptr_arg)]
fn grow(list: &Vec<u8>) -> Vec<Vec<u8>> {
    if list.len() >= SUPERSET.len() {
        return Vec::new();
    }
    SUPERSET
        .iter()
        .filter(|element| !list.contains(element))
        .map(|element| {
            let mut child = list.clone();
            child.push(*element);
            child
        })
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let tree = Tree::grown(Vec::new(), grow);

    tree.pre_order(|node| {
        if node.is_leaf() {
            println!("{:?}", node.data());
        }
    });
}
