//! Closed catalog of the permission codenames the client knows about.
//!
//! The server's permission registry is authoritative. The client mirrors it
//! here so that guards reference permissions by symbol instead of by string,
//! and checks the mirror against the server once at startup
//! ([`validate_catalog`]).

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown permission codename '{0}'")]
    UnknownCodename(String),
}

macro_rules! permission_catalog {
    ($( $variant:ident => $codename:literal ),+ $(,)?) => {
        /// Symbolic name of a permission known to the client.
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Permission {
            $( $variant, )+
        }

        impl Permission {
            /// Every catalog entry, in declaration order.
            pub const ALL: &'static [Permission] = &[ $( Permission::$variant, )+ ];

            /// Codename string exactly as the server registers it.
            pub const fn codename(self) -> &'static str {
                match self {
                    $( Permission::$variant => $codename, )+
                }
            }
        }
    };
}

permission_catalog! {
    // Shipments
    ViewShipment => "view_shipment",
    AddShipment => "add_shipment",
    ChangeShipment => "change_shipment",
    DeleteShipment => "delete_shipment",
    // Sales
    ViewSale => "view_sale",
    AddSale => "add_sale",
    ChangeSale => "change_sale",
    DeleteSale => "delete_sale",
    // Payments
    ViewPayment => "view_payment",
    AddPayment => "add_payment",
    ChangePayment => "change_payment",
    DeletePayment => "delete_payment",
    // Supplier purchases
    ViewPurchase => "view_purchase",
    AddPurchase => "add_purchase",
    ChangePurchase => "change_purchase",
    DeletePurchase => "delete_purchase",
    // Cost ledgers
    ViewLedgerEntry => "view_ledgerentry",
    AddLedgerEntry => "add_ledgerentry",
    ChangeLedgerEntry => "change_ledgerentry",
    DeleteLedgerEntry => "delete_ledgerentry",
    // Currency conversion
    ViewCurrency => "view_currency",
    AddCurrency => "add_currency",
    ChangeCurrency => "change_currency",
    DeleteCurrency => "delete_currency",
    ViewExchangeRate => "view_exchangerate",
    AddExchangeRate => "add_exchangerate",
    ChangeExchangeRate => "change_exchangerate",
    DeleteExchangeRate => "delete_exchangerate",
    // Parties
    ViewCustomer => "view_customer",
    AddCustomer => "add_customer",
    ChangeCustomer => "change_customer",
    DeleteCustomer => "delete_customer",
    ViewSupplier => "view_supplier",
    AddSupplier => "add_supplier",
    ChangeSupplier => "change_supplier",
    DeleteSupplier => "delete_supplier",
    // User administration
    ViewUser => "view_user",
    AddUser => "add_user",
    ChangeUser => "change_user",
    DeleteUser => "delete_user",
}

impl Permission {
    /// Action part of the codename (`"view"`, `"add"`, `"change"`, `"delete"`).
    pub fn action(self) -> &'static str {
        self.split().0
    }

    /// Model part of the codename (`"shipment"`, `"ledgerentry"`, ...).
    pub fn model(self) -> &'static str {
        self.split().1
    }

    fn split(self) -> (&'static str, &'static str) {
        let codename = self.codename();
        codename.split_once('_').unwrap_or((codename, ""))
    }
}

impl AsRef<str> for Permission {
    fn as_ref(&self) -> &str {
        self.codename()
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.codename())
    }
}

impl FromStr for Permission {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.codename() == s)
            .ok_or_else(|| CatalogError::UnknownCodename(s.to_string()))
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.codename())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Outcome of comparing the compiled catalog with the server's registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogReport {
    /// Catalog entries the server no longer registers. Guards using them will
    /// always deny.
    pub missing_on_server: Vec<Permission>,

    /// Server codenames the client has no symbol for.
    pub unknown_to_client: Vec<String>,
}

impl CatalogReport {
    pub fn is_in_sync(&self) -> bool {
        self.missing_on_server.is_empty() && self.unknown_to_client.is_empty()
    }
}

/// Compare the server's permission registry against [`Permission::ALL`].
///
/// Drift is reported, never raised: an out-of-sync catalog keeps working and
/// fails closed at check time.
pub fn validate_catalog<I, S>(server_codenames: I) -> CatalogReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let server: BTreeSet<String> = server_codenames
        .into_iter()
        .map(|c| c.as_ref().to_string())
        .collect();

    let missing_on_server = Permission::ALL
        .iter()
        .copied()
        .filter(|p| !server.contains(p.codename()))
        .collect();

    let unknown_to_client = server
        .into_iter()
        .filter(|c| c.parse::<Permission>().is_err())
        .collect();

    CatalogReport {
        missing_on_server,
        unknown_to_client,
    }
}
