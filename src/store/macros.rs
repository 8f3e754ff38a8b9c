use super::{SecretStore, StoreInfo};
use crate::Result;
use crate::config::Settings;

/// Builds a store for settings whose endpoint scheme it handles.
pub type StoreFactory = fn(&Settings) -> Result<Box<dyn SecretStore>>;

/// One entry of [`STORE_REGISTRY`].
#[doc(hidden)]
pub struct StoreRegistration {
    pub info: StoreInfo,
    /// Endpoint URL schemes routed to this store
    pub schemes: &'static [&'static str],
    pub factory: StoreFactory,
}

/// Every store linked into the binary, in no particular order.
#[doc(hidden)]
#[linkme::distributed_slice]
pub static STORE_REGISTRY: [StoreRegistration];

/// Registers a store for a set of endpoint schemes.
///
/// The store gets an associated `INFO: StoreInfo` constant, so its
/// `SecretStore::name` can return `Self::INFO.name`. Its config type must
/// implement `TryFrom<&Settings, Error = PrivxError>`, and the store must
/// have a `new(config) -> Result<Self>` constructor.
///
/// ```ignore
/// register_store! {
///     FileStore(FileConfig) {
///         name: "file",
///         description: "Directory of JSON secret documents (read-only)",
///         schemes: ["file"],
///         examples: ["file:///var/lib/privx-secrets"],
///     }
/// }
/// ```
#[doc(hidden)]
#[macro_export]
macro_rules! register_store {
    (
        $store:ident($config:ty) {
            name: $name:literal,
            description: $description:literal,
            schemes: [$($scheme:literal),+ $(,)?],
            examples: [$($example:literal),* $(,)?] $(,)?
        }
    ) => {
        impl $store {
            pub const INFO: $crate::store::StoreInfo = $crate::store::StoreInfo {
                name: $name,
                description: $description,
                examples: &[$($example),*],
            };
        }

        const _: () = {
            fn build(
                settings: &$crate::config::Settings,
            ) -> $crate::Result<::std::boxed::Box<dyn $crate::store::SecretStore>> {
                let config = <$config>::try_from(settings)?;
                Ok(::std::boxed::Box::new($store::new(config)?))
            }

            #[linkme::distributed_slice($crate::store::STORE_REGISTRY)]
            static REGISTRATION: $crate::store::StoreRegistration =
                $crate::store::StoreRegistration {
                    info: $store::INFO,
                    schemes: &[$($scheme),+],
                    factory: build,
                };
        };
    };
}
