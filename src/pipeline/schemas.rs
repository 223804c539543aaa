// Declared request schemas, one per route that validates input

use super::validate::{FieldKind, FieldRule, Schema};
use super::USER_ID_PARAM;

/// Routes with a declared schema. Routes absent here skip the validation
/// stage entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaId {
    CreateUser,
    UpdateUser,
    Login,
}

/// Look up the schema for a route key. Schemas are plain statics; nothing
/// is built at request time.
pub fn get(id: SchemaId) -> &'static Schema {
    match id {
        SchemaId::CreateUser => &CREATE_USER,
        SchemaId::UpdateUser => &UPDATE_USER,
        SchemaId::Login => &LOGIN,
    }
}

/// Body rules shared by create and update: a record carries a well-formed
/// email, both names, and optionally an enrolment number.
const USER_BODY: &[FieldRule] = &[
    FieldRule { name: "email", required: true, kind: FieldKind::Email },
    FieldRule { name: "firstName", required: true, kind: FieldKind::String },
    FieldRule { name: "lastName", required: true, kind: FieldKind::String },
    FieldRule { name: "enrolmentNumber", required: false, kind: FieldKind::String },
];

static CREATE_USER: Schema = Schema {
    name: "createUser",
    body: USER_BODY,
    params: &[],
    query: &[],
};

/// Update additionally pins the path parameter to the identifier shape, so
/// a malformed id is rejected here and never reaches the loader.
static UPDATE_USER: Schema = Schema {
    name: "updateUser",
    body: USER_BODY,
    params: &[FieldRule { name: USER_ID_PARAM, required: true, kind: FieldKind::HexId }],
    query: &[],
};

/// Login only requires the credential fields to be present; the values are
/// matched against configuration by the handler.
static LOGIN: Schema = Schema {
    name: "login",
    body: &[
        FieldRule { name: "email", required: true, kind: FieldKind::String },
        FieldRule { name: "password", required: true, kind: FieldKind::String },
    ],
    params: &[],
    query: &[],
};
