//! Form parsing and validation for the HTML workflows.
//!
//! Validation happens before any persistence call, and the store update
//! validates the store fields and every menu row together: one bad row
//! rejects the whole submission.
//!
//! The menu editor posts indexed fields (`items-0-id`, `items-0-name`,
//! `items-0-price`, `items-0-delete`), which plain urlencoded
//! deserialization cannot express, so the update form is parsed from the
//! raw body.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use lunchbox_core::{MenuItemId, Price};

use crate::db::stores::{MenuChange, StoreUpdate};

/// Maximum length of store and menu item names, in characters.
pub const MAX_NAME_LEN: usize = 20;

/// Validate a store or menu item name, returning the trimmed value.
/// Shared by the HTML forms and the JSON APIs.
pub(crate) fn validate_name(raw: &str) -> Result<String, String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err("This field is required.".to_owned());
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(format!("At most {MAX_NAME_LEN} characters."));
    }
    Ok(name.to_owned())
}

// =============================================================================
// Store create form
// =============================================================================

/// The store creation form.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StoreForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub notes: String,
}

/// Field-level errors for the store creation form.
#[derive(Debug, Default)]
pub struct StoreFormErrors {
    pub name: Option<String>,
}

impl StoreForm {
    /// Validate the form, returning `(name, notes)` on success.
    ///
    /// # Errors
    ///
    /// Returns field-level errors when the name is missing or too long.
    pub fn validate(&self) -> Result<(String, String), StoreFormErrors> {
        match validate_name(&self.name) {
            Ok(name) => Ok((name, self.notes.trim().to_owned())),
            Err(message) => Err(StoreFormErrors {
                name: Some(message),
            }),
        }
    }
}

// =============================================================================
// Store update form (store fields + nested menu rows)
// =============================================================================

/// One menu row as submitted by the editor.
#[derive(Debug, Default, Clone)]
pub struct MenuRowForm {
    /// Raw existing-row id; empty for new rows.
    pub id: String,
    pub name: String,
    /// Raw price text.
    pub price: String,
    /// Present when the row's delete box was checked.
    pub delete: bool,
}

impl MenuRowForm {
    /// A row the user left entirely empty; ignored by validation.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.id.trim().is_empty()
            && self.name.trim().is_empty()
            && self.price.trim().is_empty()
            && !self.delete
    }
}

/// The store update form: store fields plus the posted menu rows.
#[derive(Debug, Default, Clone)]
pub struct StoreUpdateForm {
    pub name: String,
    pub notes: String,
    pub rows: Vec<MenuRowForm>,
}

/// Field-level errors for the store update form. Row errors are aligned
/// with `StoreUpdateForm::rows` by index.
#[derive(Debug, Default)]
pub struct StoreUpdateErrors {
    pub name: Option<String>,
    pub rows: Vec<Option<String>>,
}

impl StoreUpdateErrors {
    /// Whether any field or row failed validation.
    #[must_use]
    pub fn any(&self) -> bool {
        self.name.is_some() || self.rows.iter().any(Option::is_some)
    }
}

impl StoreUpdateForm {
    /// Parse an `application/x-www-form-urlencoded` body.
    ///
    /// Unknown keys are ignored; row indices may be sparse and are
    /// compacted in submission order.
    #[must_use]
    pub fn parse(body: &[u8]) -> Self {
        let mut form = Self::default();
        let mut rows: BTreeMap<usize, MenuRowForm> = BTreeMap::new();

        for (key, value) in url::form_urlencoded::parse(body) {
            match key.as_ref() {
                "name" => form.name = value.into_owned(),
                "notes" => form.notes = value.into_owned(),
                key => {
                    let Some((index, field)) = parse_row_key(key) else {
                        continue;
                    };
                    let row = rows.entry(index).or_default();
                    match field {
                        "id" => row.id = value.into_owned(),
                        "name" => row.name = value.into_owned(),
                        "price" => row.price = value.into_owned(),
                        "delete" => row.delete = true,
                        _ => {}
                    }
                }
            }
        }

        form.rows = rows.into_values().collect();
        form
    }

    /// Validate the whole submission, returning the update to apply.
    ///
    /// Row semantics:
    /// - delete flag on an existing row removes it (values ignored),
    /// - a row with an id updates that row,
    /// - a row without an id inserts a new one,
    /// - fully blank rows are skipped.
    ///
    /// # Errors
    ///
    /// Returns every field and row error at once; nothing may be
    /// persisted when any of them is set.
    pub fn validate(&self) -> Result<StoreUpdate, StoreUpdateErrors> {
        let mut errors = StoreUpdateErrors {
            name: None,
            rows: vec![None; self.rows.len()],
        };

        let name = match validate_name(&self.name) {
            Ok(name) => name,
            Err(message) => {
                errors.name = Some(message);
                String::new()
            }
        };

        let mut menu = Vec::new();
        for (index, row) in self.rows.iter().enumerate() {
            if row.is_blank() {
                continue;
            }

            let id = match parse_row_id(&row.id) {
                Ok(id) => id,
                Err(message) => {
                    errors.rows[index] = Some(message);
                    continue;
                }
            };

            if row.delete {
                match id {
                    Some(id) => menu.push(MenuChange::Delete { id }),
                    None => errors.rows[index] = Some("Cannot delete an unsaved row.".to_owned()),
                }
                continue;
            }

            let item_name = match validate_name(&row.name) {
                Ok(name) => name,
                Err(message) => {
                    errors.rows[index] = Some(message);
                    continue;
                }
            };

            let price = match row.price.trim().parse::<i64>() {
                Ok(price) => Price::new(price),
                Err(_) => {
                    errors.rows[index] = Some("Price must be a whole number.".to_owned());
                    continue;
                }
            };

            match id {
                Some(id) => menu.push(MenuChange::Update {
                    id,
                    name: item_name,
                    price,
                }),
                None => menu.push(MenuChange::Insert {
                    name: item_name,
                    price,
                }),
            }
        }

        if errors.any() {
            return Err(errors);
        }

        Ok(StoreUpdate {
            name,
            notes: self.notes.trim().to_owned(),
            menu,
        })
    }
}

/// Split a menu row key like `items-3-price` into `(3, "price")`.
fn parse_row_key(key: &str) -> Option<(usize, &str)> {
    let rest = key.strip_prefix("items-")?;
    let (index, field) = rest.split_once('-')?;
    Some((index.parse().ok()?, field))
}

fn parse_row_id(raw: &str) -> Result<Option<MenuItemId>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<MenuItemId>()
        .map(Some)
        .map_err(|_| "Invalid row identifier.".to_owned())
}

// =============================================================================
// Order form
// =============================================================================

/// The order form on the event detail page.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct OrderForm {
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub notes: String,
}

/// Why an order submission was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderFormError {
    #[error("an item must be chosen")]
    MissingItem,
    #[error("the chosen item is not on this event's menu")]
    ItemNotAllowed,
}

impl OrderForm {
    /// Validate the submission against the allowed item set.
    ///
    /// The allowed set is the menu of the order's event's store; passing
    /// it explicitly keeps the restriction a visible workflow rule rather
    /// than form magic.
    ///
    /// # Errors
    ///
    /// Returns `OrderFormError` when the item is missing, unparseable, or
    /// outside the allowed set.
    pub fn validate(
        &self,
        allowed: &[MenuItemId],
    ) -> Result<(MenuItemId, String), OrderFormError> {
        let raw = self.item.trim();
        if raw.is_empty() {
            return Err(OrderFormError::MissingItem);
        }
        let item: MenuItemId = raw.parse().map_err(|_| OrderFormError::ItemNotAllowed)?;
        if !allowed.contains(&item) {
            return Err(OrderFormError::ItemNotAllowed);
        }
        Ok((item, self.notes.trim().to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_form_requires_a_name() {
        let form = StoreForm {
            name: "   ".to_owned(),
            notes: "whatever".to_owned(),
        };
        let errors = form.validate().expect_err("blank name rejected");
        assert!(errors.name.is_some());
    }

    #[test]
    fn store_form_caps_name_length() {
        let form = StoreForm {
            name: "x".repeat(MAX_NAME_LEN + 1),
            notes: String::new(),
        };
        assert!(form.validate().is_err());

        let form = StoreForm {
            name: "x".repeat(MAX_NAME_LEN),
            notes: String::new(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn store_form_trims_fields() {
        let form = StoreForm {
            name: "  Kennedy  ".to_owned(),
            notes: " fried chicken \n".to_owned(),
        };
        let (name, notes) = form.validate().expect("valid");
        assert_eq!(name, "Kennedy");
        assert_eq!(notes, "fried chicken");
    }

    #[test]
    fn update_form_parses_indexed_rows() {
        let body = b"name=McDonald%27s&notes=&items-0-id=7&items-0-name=Big+Mac+Meal&\
                     items-0-price=99&items-1-id=&items-1-name=Cone&items-1-price=15";
        let form = StoreUpdateForm::parse(body);
        assert_eq!(form.name, "McDonald's");
        assert_eq!(form.rows.len(), 2);
        assert_eq!(form.rows[0].id, "7");
        assert_eq!(form.rows[0].name, "Big Mac Meal");
        assert_eq!(form.rows[1].id, "");
        assert_eq!(form.rows[1].price, "15");
    }

    #[test]
    fn update_form_rows_may_be_sparse() {
        let body = b"name=s&items-5-name=Cone&items-5-price=15&items-2-name=Fries&items-2-price=30";
        let form = StoreUpdateForm::parse(body);
        // Compacted in index order.
        assert_eq!(form.rows.len(), 2);
        assert_eq!(form.rows[0].name, "Fries");
        assert_eq!(form.rows[1].name, "Cone");
    }

    #[test]
    fn update_validation_maps_rows_to_changes() {
        let body = b"name=McDonald%27s&items-0-id=7&items-0-name=Big+Mac+Meal&items-0-price=99&\
                     items-1-name=Cone&items-1-price=15&items-2-id=9&items-2-delete=on&\
                     items-3-id=&items-3-name=&items-3-price=";
        let update = StoreUpdateForm::parse(body).validate().expect("valid");
        assert_eq!(update.menu.len(), 3);
        assert!(matches!(
            update.menu[0],
            MenuChange::Update { id, .. } if id == MenuItemId::new(7)
        ));
        assert!(matches!(update.menu[1], MenuChange::Insert { .. }));
        assert!(matches!(
            update.menu[2],
            MenuChange::Delete { id } if id == MenuItemId::new(9)
        ));
    }

    #[test]
    fn update_validation_rejects_the_whole_submission_on_one_bad_row() {
        let body = b"name=McDonald%27s&items-0-name=Big+Mac+Meal&items-0-price=99&\
                     items-1-name=Cone&items-1-price=cheap";
        let errors = StoreUpdateForm::parse(body)
            .validate()
            .expect_err("bad price rejected");
        assert!(errors.name.is_none());
        assert!(errors.rows[0].is_none());
        assert!(errors.rows[1].is_some());
    }

    #[test]
    fn update_validation_collects_store_and_row_errors_together() {
        let body = b"name=&items-0-name=Cone&items-0-price=abc";
        let errors = StoreUpdateForm::parse(body)
            .validate()
            .expect_err("both errors reported");
        assert!(errors.name.is_some());
        assert!(errors.rows[0].is_some());
    }

    #[test]
    fn order_form_restricts_items_to_the_allowed_set() {
        let allowed = [MenuItemId::new(1), MenuItemId::new(2)];

        let form = OrderForm {
            item: "2".to_owned(),
            notes: " no pickles ".to_owned(),
        };
        let (item, notes) = form.validate(&allowed).expect("allowed item accepted");
        assert_eq!(item, MenuItemId::new(2));
        assert_eq!(notes, "no pickles");

        let form = OrderForm {
            item: "3".to_owned(),
            notes: String::new(),
        };
        assert_eq!(
            form.validate(&allowed),
            Err(OrderFormError::ItemNotAllowed)
        );

        let form = OrderForm::default();
        assert_eq!(form.validate(&allowed), Err(OrderFormError::MissingItem));
    }
}
