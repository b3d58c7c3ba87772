//! Pre-order traversal of a value graph into an ordered node sequence.
//!
//! The walker is pure: it does not mutate the input and performs no I/O. It
//! produces one [`Node`] per reachable position, containers first, children
//! immediately after (strict pre-order, depth-first). Optional and pointer
//! indirections are unwrapped before a node is emitted; an absent value is a
//! terminal node.

use crate::error::{Cause, CheckError};
use crate::value::{Record, Reflect, Shape, Value};

/// Field metadata attached to record-field nodes.
#[derive(Debug, Clone, Copy)]
pub struct FieldMeta {
    /// Field name in its record's declaration.
    pub name: &'static str,
    /// Raw directive string, when the field carries one.
    pub directive: Option<&'static str>,
}

/// One visited position in the traversed value graph.
pub struct Node<'v> {
    value: Value<'v>,
    field: Option<FieldMeta>,
    parent: Option<&'v dyn Record>,
    indirect: bool,
}

impl<'v> Node<'v> {
    /// The dereferenced value at this position.
    pub fn value(&self) -> Value<'v> {
        self.value
    }

    /// Field metadata, present only for record-field nodes.
    pub fn field(&self) -> Option<&FieldMeta> {
        self.field.as_ref()
    }

    /// The nearest enclosing record, if any. `call:` targets resolve here.
    pub fn parent(&self) -> Option<&'v dyn Record> {
        self.parent
    }

    /// Whether the original value sat behind an optional/pointer indirection.
    pub fn indirect(&self) -> bool {
        self.indirect
    }

    /// Diagnostic name: the field name, or the value's own type/kind.
    pub fn name(&self) -> &'static str {
        if let Some(field) = &self.field {
            return field.name;
        }
        match self.value.shape() {
            Some(Shape::Record(record)) => record.type_name(),
            Some(Shape::Sequence(_)) => "sequence",
            Some(Shape::Map(_)) => "map",
            _ => "value",
        }
    }
}

/// Ancestor trails for cycle detection. Only repetition along the current
/// chain is a cycle; sharing a subtree between siblings is not.
struct Trail {
    /// Data pointers of dereferenced indirection targets.
    derefs: Vec<*const ()>,
    /// Visited records as (address, type name). The type name disambiguates
    /// a record from a first field stored at the same address.
    records: Vec<(*const (), &'static str)>,
}

fn ptr_id(value: &dyn Reflect) -> *const () {
    value as *const dyn Reflect as *const ()
}

fn ptr_id_record(record: &dyn Record) -> *const () {
    record as *const dyn Record as *const ()
}

/// Produce the ordered node sequence for the graph rooted at `root`.
///
/// An absent root yields an empty sequence. A graph that re-enters a value
/// already on the current ancestor chain fails with a `cyclic graph` error.
pub fn walk(root: &dyn Reflect) -> Result<Vec<Node<'_>>, CheckError> {
    if let Shape::Optional(None) = root.shape() {
        return Ok(Vec::new());
    }
    let mut nodes = Vec::new();
    let mut trail = Trail {
        derefs: Vec::new(),
        records: Vec::new(),
    };
    visit(root, None, None, &mut trail, &mut nodes)?;
    Ok(nodes)
}

fn visit<'v>(
    value: &'v dyn Reflect,
    field: Option<FieldMeta>,
    parent: Option<&'v dyn Record>,
    trail: &mut Trail,
    nodes: &mut Vec<Node<'v>>,
) -> Result<(), CheckError> {
    // Unwrap optional/pointer indirections down to the concrete value.
    let mut current = value;
    let mut indirect = false;
    let mut derefs_pushed = 0;
    let resolved = loop {
        match current.shape() {
            Shape::Optional(None) => {
                indirect = true;
                break None;
            }
            Shape::Optional(Some(inner)) => {
                indirect = true;
                let id = ptr_id(inner);
                if trail.derefs.contains(&id) {
                    trail.derefs.truncate(trail.derefs.len() - derefs_pushed);
                    return Err(cycle_error(&field, inner));
                }
                trail.derefs.push(id);
                derefs_pushed += 1;
                current = inner;
            }
            _ => break Some(current),
        }
    };

    let node_value = match resolved {
        Some(v) => Value::present(v),
        None => Value::absent(),
    };
    nodes.push(Node {
        value: node_value,
        field,
        parent,
        indirect,
    });

    let result = match resolved.map(Reflect::shape) {
        Some(Shape::Record(record)) => visit_record(record, &field, trail, nodes),
        Some(Shape::Sequence(items)) => items
            .into_iter()
            .try_for_each(|item| visit(item, None, parent, trail, nodes)),
        Some(Shape::Map(entries)) => entries
            .into_iter()
            .try_for_each(|(_, entry)| visit(entry, None, parent, trail, nodes)),
        _ => Ok(()),
    };

    trail.derefs.truncate(trail.derefs.len() - derefs_pushed);
    result
}

fn visit_record<'v>(
    record: &'v dyn Record,
    field: &Option<FieldMeta>,
    trail: &mut Trail,
    nodes: &mut Vec<Node<'v>>,
) -> Result<(), CheckError> {
    let id = (ptr_id_record(record), record.type_name());
    if trail.records.contains(&id) {
        let name = match field {
            Some(meta) => meta.name,
            None => record.type_name(),
        };
        return Err(CheckError::new(Cause::CyclicGraph, name));
    }
    trail.records.push(id);

    let result = record.fields().into_iter().try_for_each(|f| {
        let meta = FieldMeta {
            name: f.name,
            directive: f.directive,
        };
        visit(f.value, Some(meta), Some(record), trail, nodes)
    });

    trail.records.pop();
    result
}

fn cycle_error(field: &Option<FieldMeta>, at: &dyn Reflect) -> CheckError {
    let name = match field {
        Some(meta) => meta.name.to_string(),
        None => match at.shape() {
            Shape::Record(record) => record.type_name().to_string(),
            _ => "value".to_string(),
        },
    };
    CheckError::new(Cause::CyclicGraph, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Field;
    use std::sync::Arc;

    struct Inner {
        id: i64,
    }

    impl Reflect for Inner {
        fn shape(&self) -> Shape<'_> {
            Shape::Record(self)
        }
    }

    impl Record for Inner {
        fn type_name(&self) -> &'static str {
            "Inner"
        }

        fn fields(&self) -> Vec<Field<'_>> {
            vec![Field::new("Id", &self.id)]
        }
    }

    struct Outer {
        name: String,
        inner: Inner,
        items: Vec<i64>,
    }

    impl Reflect for Outer {
        fn shape(&self) -> Shape<'_> {
            Shape::Record(self)
        }
    }

    impl Record for Outer {
        fn type_name(&self) -> &'static str {
            "Outer"
        }

        fn fields(&self) -> Vec<Field<'_>> {
            vec![
                Field::new("Name", &self.name),
                Field::new("Inner", &self.inner),
                Field::new("Items", &self.items),
            ]
        }
    }

    fn sample() -> Outer {
        Outer {
            name: "root".to_string(),
            inner: Inner { id: 7 },
            items: vec![1, 2],
        }
    }

    #[test]
    fn preorder_containers_before_children() {
        let outer = sample();
        let nodes = walk(&outer).unwrap();
        let names: Vec<&str> = nodes.iter().map(Node::name).collect();
        assert_eq!(
            names,
            ["Outer", "Name", "Inner", "Id", "Items", "value", "value"]
        );
    }

    #[test]
    fn parent_is_nearest_record() {
        let outer = sample();
        let nodes = walk(&outer).unwrap();

        // root has no parent
        assert!(nodes[0].parent().is_none());
        // Inner's Id field belongs to Inner, not Outer
        let id_node = &nodes[3];
        assert_eq!(id_node.name(), "Id");
        assert_eq!(id_node.parent().unwrap().type_name(), "Inner");
        // sequence elements inherit the record enclosing the sequence
        let element = &nodes[5];
        assert_eq!(element.parent().unwrap().type_name(), "Outer");
    }

    #[test]
    fn absent_root_yields_empty_sequence() {
        let none: Option<Outer> = None;
        let nodes = walk(&none).unwrap();
        assert!(nodes.is_empty());
    }

    #[test]
    fn absent_field_is_terminal() {
        struct Holder {
            maybe: Option<Inner>,
        }

        impl Reflect for Holder {
            fn shape(&self) -> Shape<'_> {
                Shape::Record(self)
            }
        }

        impl Record for Holder {
            fn type_name(&self) -> &'static str {
                "Holder"
            }

            fn fields(&self) -> Vec<Field<'_>> {
                vec![Field::new("Maybe", &self.maybe)]
            }
        }

        let holder = Holder { maybe: None };
        let nodes = walk(&holder).unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(nodes[1].value().is_absent());
        assert!(nodes[1].indirect());
    }

    #[test]
    fn shared_subtree_is_not_a_cycle() {
        struct Pair {
            left: Arc<Inner>,
            right: Arc<Inner>,
        }

        impl Reflect for Pair {
            fn shape(&self) -> Shape<'_> {
                Shape::Record(self)
            }
        }

        impl Record for Pair {
            fn type_name(&self) -> &'static str {
                "Pair"
            }

            fn fields(&self) -> Vec<Field<'_>> {
                vec![
                    Field::new("Left", &self.left),
                    Field::new("Right", &self.right),
                ]
            }
        }

        let shared = Arc::new(Inner { id: 1 });
        let pair = Pair {
            left: Arc::clone(&shared),
            right: shared,
        };
        let nodes = walk(&pair).unwrap();
        // Pair, Left(Inner), Id, Right(Inner), Id
        assert_eq!(nodes.len(), 5);
        assert!(nodes[1].indirect());
    }

    #[test]
    fn self_referential_graph_fails_fast() {
        use std::cell::Cell;

        struct Link<'a> {
            id: i64,
            next: Cell<Option<&'a Link<'a>>>,
        }

        impl<'a> Reflect for Link<'a> {
            fn shape(&self) -> Shape<'_> {
                Shape::Record(self)
            }
        }

        impl<'a> Record for Link<'a> {
            fn type_name(&self) -> &'static str {
                "Link"
            }

            fn fields(&self) -> Vec<Field<'_>> {
                let mut fields = vec![Field::new("Id", &self.id)];
                if let Some(next) = self.next.get() {
                    fields.push(Field::new("Next", next));
                }
                fields
            }
        }

        let a = Link {
            id: 1,
            next: Cell::new(None),
        };
        let b = Link {
            id: 2,
            next: Cell::new(Some(&a)),
        };
        a.next.set(Some(&b));

        let err = walk(&a).unwrap_err();
        assert_eq!(err.to_string(), "cyclic graph: Next");
    }
}
