use bincode::{Decode, Encode};

use crate::{
    template::{Template, TemplateField},
    tuple::Tuple,
    value::FieldKind,
};

use super::ResponseShape;

/// The eight remote operations.
///
/// Get/Query pairs only differ in whether the node removes the matched tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode)]
pub enum Operation {
    Insert,
    InsertAsync,
    BlockingGet,
    BlockingQuery,
    TryGet,
    TryQuery,
    GetAll,
    QueryAll,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::Insert,
        Operation::InsertAsync,
        Operation::BlockingGet,
        Operation::BlockingQuery,
        Operation::TryGet,
        Operation::TryQuery,
        Operation::GetAll,
        Operation::QueryAll,
    ];

    pub fn response_shape(self) -> ResponseShape {
        match self {
            Operation::Insert => ResponseShape::Ack,
            Operation::InsertAsync => ResponseShape::Nothing,
            Operation::BlockingGet | Operation::BlockingQuery => ResponseShape::Tuple,
            Operation::TryGet | Operation::TryQuery => ResponseShape::Flagged,
            Operation::GetAll | Operation::QueryAll => ResponseShape::TupleList,
        }
    }

    /// Whether the node removes what it matches.
    pub fn is_destructive(self) -> bool {
        matches!(
            self,
            Operation::BlockingGet | Operation::TryGet | Operation::GetAll
        )
    }
}

#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub enum Payload {
    Tuple(Tuple),
    Template(Template),
    Empty,
}

/// Wire envelope sent once per call.
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub struct Request {
    pub operation: Operation,
    pub payload: Payload,
}

impl Request {
    pub fn insert(tuple: Tuple) -> Self {
        Self {
            operation: Operation::Insert,
            payload: Payload::Tuple(tuple),
        }
    }

    pub fn insert_async(tuple: Tuple) -> Self {
        Self {
            operation: Operation::InsertAsync,
            payload: Payload::Tuple(tuple),
        }
    }

    /// Removes a match, blocking until one exists.
    pub fn blocking_get(template: Template) -> Self {
        Self::with_template(Operation::BlockingGet, template)
    }

    /// Reads a match, blocking until one exists.
    pub fn blocking_query(template: Template) -> Self {
        Self::with_template(Operation::BlockingQuery, template)
    }

    pub fn try_get(template: Template) -> Self {
        Self::with_template(Operation::TryGet, template)
    }

    pub fn try_query(template: Template) -> Self {
        Self::with_template(Operation::TryQuery, template)
    }

    pub fn get_all() -> Self {
        Self {
            operation: Operation::GetAll,
            payload: Payload::Empty,
        }
    }

    pub fn query_all() -> Self {
        Self {
            operation: Operation::QueryAll,
            payload: Payload::Empty,
        }
    }

    fn with_template(operation: Operation, template: Template) -> Self {
        Self {
            operation,
            payload: Payload::Template(template),
        }
    }

    /// Every field kind appearing in the payload.
    pub fn field_kinds(&self) -> Vec<FieldKind> {
        match &self.payload {
            Payload::Tuple(tuple) => tuple.iter().map(|v| v.kind()).collect(),
            Payload::Template(template) => {
                template.fields().iter().map(TemplateField::kind).collect()
            }
            Payload::Empty => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_shapes() {
        let inputs = vec![
            (Operation::Insert, ResponseShape::Ack),
            (Operation::InsertAsync, ResponseShape::Nothing),
            (Operation::BlockingGet, ResponseShape::Tuple),
            (Operation::BlockingQuery, ResponseShape::Tuple),
            (Operation::TryGet, ResponseShape::Flagged),
            (Operation::TryQuery, ResponseShape::Flagged),
            (Operation::GetAll, ResponseShape::TupleList),
            (Operation::QueryAll, ResponseShape::TupleList),
        ];

        for (op, expected) in inputs {
            assert_eq!(op.response_shape(), expected);
        }
    }

    #[test]
    fn destructive_operations() {
        let destructive = Operation::ALL
            .into_iter()
            .filter(|op| op.is_destructive())
            .collect::<Vec<_>>();

        assert_eq!(
            destructive,
            vec![Operation::BlockingGet, Operation::TryGet, Operation::GetAll]
        );
    }

    #[test]
    fn template_request_kinds() {
        let template = Template::builder().slot::<i64>().literal("a").build();
        let request = Request::try_query(template);

        assert_eq!(request.field_kinds(), vec![FieldKind::Int, FieldKind::Str]);
    }

    #[test]
    fn bulk_request_is_empty() {
        let request = Request::query_all();

        assert_eq!(request.payload, Payload::Empty);
        assert!(request.field_kinds().is_empty());
    }

    #[test]
    fn constructors_carry_payload_of_their_shape() {
        let template = Template::builder().slot::<bool>().build();
        let requests = vec![
            Request::insert(Tuple::default()),
            Request::insert_async(Tuple::default()),
            Request::blocking_get(template.clone()),
            Request::blocking_query(template.clone()),
            Request::try_get(template.clone()),
            Request::try_query(template),
            Request::get_all(),
            Request::query_all(),
        ];

        let operations = requests.iter().map(|r| r.operation).collect::<Vec<_>>();
        assert_eq!(operations, Operation::ALL);

        for request in requests {
            let fits = match request.operation.response_shape() {
                ResponseShape::Ack | ResponseShape::Nothing => {
                    matches!(request.payload, Payload::Tuple(_))
                }
                ResponseShape::Tuple | ResponseShape::Flagged => {
                    matches!(request.payload, Payload::Template(_))
                }
                ResponseShape::TupleList => request.payload == Payload::Empty,
            };
            assert!(fits, "{request:?}");
        }
    }
}
