//! Property resolution: single segments and dotted paths.
//!
//! `order.customer.address` resolves `order` on the root node, then
//! `customer` on the result, then `address` on that. A missing segment ends
//! the walk with `None` and later segments are never looked up.

use crate::error::{ResolveError, Result};
use crate::query_trace;
use crate::type_info::{Memo, TypeInfo};
use crate::types::RawType;
use tracing::{debug, trace};
use tyres_common::limits::MAX_PROPERTY_PATH_SEGMENTS;

impl TypeInfo {
    /// The type of the property at `path`, a simple name or a dotted path.
    ///
    /// Returns `None` if any segment does not exist. Empty segments (`""`,
    /// `"a..b"`, `"a."`) are rejected.
    pub fn property(&self, path: &str) -> Result<Option<TypeInfo>> {
        let query_id = query_trace::begin();
        if let Some(id) = query_id {
            query_trace::property_start(id, self.hash_value(), path);
        }

        let result = self.property_path(path);
        if let Some(id) = query_id {
            let found = matches!(result, Ok(Some(_)));
            query_trace::unary_end(id, "property", found, false);
        }
        result
    }

    fn property_path(&self, path: &str) -> Result<Option<TypeInfo>> {
        let mut current = self.clone();
        for (index, segment) in path.split('.').enumerate() {
            if index as u32 >= MAX_PROPERTY_PATH_SEGMENTS {
                let err = ResolveError::RecursionLimit {
                    operation: "property path",
                };
                debug!(%err, path, "property");
                return Err(err);
            }
            if segment.is_empty() {
                return Err(ResolveError::invalid_argument(format!(
                    "property path '{path}' contains an empty segment"
                )));
            }
            match current.simple_property(segment)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Like [`property`](Self::property), but a missing property is an error.
    pub fn required_property(&self, path: &str) -> Result<TypeInfo> {
        self.property(path)?.ok_or_else(|| ResolveError::MissingProperty {
            owner: self.hierarchy().raw_type_name(self.raw_type()),
            path: path.to_string(),
        })
    }

    /// Single-segment lookup through the per-node property cache. Misses are
    /// cached too.
    fn simple_property(&self, name: &str) -> Result<Option<TypeInfo>> {
        if let Some(memo) = self.0.properties.get(name) {
            return Ok(memo.restore(self));
        }

        trace!(property = name, node = self.hash_value(), "property cache miss");
        let computed = self.compute_property(name)?;
        let memo = Memo::capture(self, computed);
        let published = self
            .0
            .properties
            .entry(name.to_string())
            .or_insert(memo)
            .clone();
        Ok(published.restore(self))
    }

    fn compute_property(&self, name: &str) -> Result<Option<TypeInfo>> {
        if let Some(target) = self.variable_target()? {
            return target.simple_property(name);
        }

        let raw = self.raw_type();
        let Some(declared) = self.0.env.properties.property_type(raw, name) else {
            return Ok(None);
        };
        let context = self.member_context(declared.declaring_class)?;
        trace!(
            property = name,
            declaring_class = declared.declaring_class.0,
            inherited = raw != &RawType::Class(declared.declaring_class),
            "property found"
        );
        context.create_info(&declared.ty).map(Some)
    }
}

#[cfg(test)]
#[path = "../tests/property_path_tests.rs"]
mod tests;
