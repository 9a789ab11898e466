//! Collision-free id helpers. Ids are stable wire keys: conditional rules
//! and submission data join on them across saves.

use uuid::Uuid;

pub fn new_template_id() -> String {
    format!("tpl_{}", Uuid::new_v4().simple())
}

pub fn new_page_id() -> String {
    format!("pg_{}", Uuid::new_v4().simple())
}

pub fn new_field_id() -> String {
    format!("fld_{}", Uuid::new_v4().simple())
}

pub fn new_option_id() -> String {
    format!("opt_{}", Uuid::new_v4().simple())
}

pub fn new_submission_id() -> String {
    format!("sub_{}", Uuid::new_v4().simple())
}
