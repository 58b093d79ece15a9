//! Reference fields: asset, assets, relation
//!
//! Referenced ids must exist within the current space. List-valued fields
//! issue one batched lookup per field and fail as a whole when any id is
//! missing. A relation whose target collection cannot be resolved in the
//! space fails closed: every supplied value is rejected.

use serde_json::Value;

use super::rules;
use super::validator::{Checked, EntryValidator};
use super::errors::ValidationErrors;
use crate::providers::{CollaboratorResult, ReferenceTarget};
use crate::schema::RelationSpec;

impl<'c, 'a> EntryValidator<'c, 'a> {
    pub(super) fn check_asset(
        &self,
        value: &Value,
        path: &str,
        label: &str,
        allowed_kinds: &[String],
    ) -> CollaboratorResult<Checked<Option<Value>>> {
        let id = match rules::integer_id(value, label) {
            Ok(id) => id,
            Err(message) => return Ok(Checked::fail(path, message)),
        };

        let target = ReferenceTarget::Asset { kinds: allowed_kinds };
        self.check_single(value, id, path, label, target)
    }

    pub(super) fn check_assets(
        &self,
        value: &Value,
        path: &str,
        label: &str,
        allowed_kinds: &[String],
    ) -> CollaboratorResult<Checked<Option<Value>>> {
        let target = ReferenceTarget::Asset { kinds: allowed_kinds };
        self.check_many(value, path, label, target)
    }

    pub(super) fn check_relation(
        &self,
        value: &Value,
        path: &str,
        label: &str,
        relation: &RelationSpec,
    ) -> CollaboratorResult<Checked<Option<Value>>> {
        let resolved = self
            .ctx
            .existence()
            .resolve_collection(self.ctx.space(), &relation.collection)?;

        let Some(collection) = resolved else {
            return Ok(Checked::fail(
                path,
                format!(
                    "The {} field references unknown collection '{}'.",
                    label, relation.collection
                ),
            ));
        };

        let target = ReferenceTarget::Entry { collection };
        if relation.is_single() {
            let id = match rules::integer_id(value, label) {
                Ok(id) => id,
                Err(message) => return Ok(Checked::fail(path, message)),
            };
            self.check_single(value, id, path, label, target)
        } else {
            self.check_many(value, path, label, target)
        }
    }

    fn check_single(
        &self,
        value: &Value,
        id: i64,
        path: &str,
        label: &str,
        target: ReferenceTarget<'_>,
    ) -> CollaboratorResult<Checked<Option<Value>>> {
        if self.ctx.existence().exists(self.ctx.space(), target, id)? {
            Ok(Checked::valid(value.clone()))
        } else {
            Ok(Checked::fail(path, format!("The selected {} is invalid.", label)))
        }
    }

    fn check_many(
        &self,
        value: &Value,
        path: &str,
        label: &str,
        target: ReferenceTarget<'_>,
    ) -> CollaboratorResult<Checked<Option<Value>>> {
        let Some(items) = value.as_array() else {
            return Ok(Checked::fail(path, format!("The {} field must be an array.", label)));
        };

        let mut ids = Vec::with_capacity(items.len());
        let mut errors = ValidationErrors::new();
        for (i, item) in items.iter().enumerate() {
            match rules::reference_id(item) {
                Some(id) => ids.push(id),
                None => errors.add(
                    format!("{}.{}", path, i),
                    format!("The {}.{} field must be an integer.", label, i),
                ),
            }
        }

        if !errors.is_empty() {
            return Ok(Checked {
                value: None,
                errors,
            });
        }
        if ids.is_empty() {
            return Ok(Checked::valid(value.clone()));
        }

        let found = self.ctx.existence().existing(self.ctx.space(), target, &ids)?;
        if ids.iter().all(|id| found.contains(id)) {
            Ok(Checked::valid(value.clone()))
        } else {
            Ok(Checked::fail(path, format!("The selected {} is invalid.", label)))
        }
    }
}
