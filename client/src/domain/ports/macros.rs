//! Helper macro for declaring domain port error enums.
//!
//! Each variant gets a `thiserror` message, a snake_case constructor whose
//! fields accept anything convertible into the declared type, and an
//! `is_<variant>` predicate. Adapters can write
//! `MenuStoreError::transport(err.to_string())` or pass a `&str`.

macro_rules! define_port_error {
    (@is $variant:ident) => {
        ::paste::paste! {
            #[doc = "Return whether this is the `" $variant "` variant."]
            #[must_use]
            pub const fn [<is_ $variant:snake>](&self) -> bool {
                matches!(self, Self::$variant { .. })
            }
        }
    };

    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = "Construct the `" $variant "` variant."]
            #[must_use]
            pub const fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_fields $variant () () $( $field : $ty, )*);
    };

    (@ctor_fields $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = "Construct the `" $variant "` variant."]
            #[must_use]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_fields $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_fields
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( {
                    $( $(#[$field_meta:meta])* $field:ident : $ty:ty ),* $(,)?
                } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $( $(#[$field_meta])* $field : $ty ),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
                define_port_error!(@is $variant);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Constructor generation for port errors.
    define_port_error! {
        pub enum SampleStoreError {
            Offline => "store offline",
            Rejected {
                /// HTTP status returned by the store.
                status: u16,
            } => "store rejected request with status {status}",
            Garbled { message: String, offset: usize } => "garbled body at {offset}: {message}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(SampleStoreError::offline(), SampleStoreError::Offline);
        assert_eq!(SampleStoreError::offline().to_string(), "store offline");
    }

    #[test]
    fn field_constructors_convert_their_arguments() {
        let error = SampleStoreError::garbled("unexpected `}`", 12_usize);
        assert_eq!(error.to_string(), "garbled body at 12: unexpected `}`");
        assert_eq!(
            SampleStoreError::rejected(503_u16).to_string(),
            "store rejected request with status 503"
        );
    }

    #[test]
    fn predicates_match_only_their_variant() {
        let error = SampleStoreError::rejected(409_u16);
        assert!(error.is_rejected());
        assert!(!error.is_offline());
        assert!(!error.is_garbled());
        assert!(SampleStoreError::offline().is_offline());
    }

    #[test]
    fn predicates_and_unit_constructors_are_usable_in_const_context() {
        static OFFLINE: SampleStoreError = SampleStoreError::offline();
        const IS_OFFLINE: bool = OFFLINE.is_offline();
        assert!(IS_OFFLINE);
    }

    #[test]
    fn documented_fields_keep_their_constructor_shape() {
        let error = SampleStoreError::rejected(404_u16);
        assert_eq!(error, SampleStoreError::Rejected { status: 404 });
    }
}
