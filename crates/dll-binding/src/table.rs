//! Declarative entry point tables.

/// Declare a table of vendor entry points and its forwarding methods.
///
/// ```rust,ignore
/// entry_points! {
///     /// Entry points exported by `vendor.dll`.
///     pub struct VendorEntryPoints for Vendor {
///         /// Open the device.
///         fn open(port: c_int) -> c_int = c"Vendor_open";
///     }
/// }
/// ```
///
/// This expands to:
///
/// - a `Copy` struct holding one `unsafe extern "system" fn` field per row,
/// - an [`EntryPoints`](crate::EntryPoints) impl that resolves the rows in
///   declaration order and stops at the first missing export,
/// - an `impl<L: LibraryLoader> Vendor<L>` block with one `unsafe fn` per row
///   that ensures the library is bound, then forwards its arguments. Binding
///   failures are returned as [`BindError::code`](crate::BindError::code).
///
/// The wrapper type must have exactly one type parameter (the loader) and a
/// field named `binding` of type `LazyBinding<L, VendorEntryPoints>`.
#[macro_export]
macro_rules! entry_points {
    (
        $(#[$meta:meta])*
        $vis:vis struct $table:ident for $wrapper:ident {
            $(
                $(#[doc = $doc:literal])*
                fn $method:ident ( $($arg:ident : $ty:ty),* $(,)? ) -> $ret:ty = $symbol:expr;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        $vis struct $table {
            $(
                $(#[doc = $doc])*
                #[doc = concat!("\n\nExport: `", stringify!($symbol), "`.")]
                pub $method: unsafe extern "system" fn($($ty),*) -> $ret,
            )*
        }

        impl $crate::EntryPoints for $table {
            const SYMBOLS: &'static [&'static ::core::ffi::CStr] = &[$($symbol),*];

            fn resolve<S: $crate::SymbolSource + ?Sized>(
                source: &S,
            ) -> ::core::result::Result<Self, $crate::MissingSymbol> {
                // Field initialisers run in the order written, which is the
                // order of SYMBOLS.
                ::core::result::Result::Ok(Self {
                    $(
                        $method: {
                            let symbol: &'static ::core::ffi::CStr = $symbol;
                            let address = source
                                .address(symbol)
                                .ok_or($crate::MissingSymbol(symbol))?;
                            // SAFETY: the export is declared with this exact
                            // signature in the vendor header.
                            unsafe {
                                $crate::__private::transmute::<
                                    *mut $crate::__private::c_void,
                                    unsafe extern "system" fn($($ty),*) -> $ret,
                                >(address.as_ptr())
                            }
                        },
                    )*
                })
            }
        }

        impl ::core::fmt::Debug for $table {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.debug_struct(stringify!($table))
                    $(.field(stringify!($method), &(self.$method as *const ())))*
                    .finish()
            }
        }

        impl<L: $crate::LibraryLoader> $wrapper<L> {
            $(
                $(#[doc = $doc])*
                ///
                /// # Safety
                ///
                /// Arguments are passed to the vendor export unchanged. Pointer
                /// arguments must be valid for the reads and writes the vendor
                /// documents for this call.
                #[allow(clippy::too_many_arguments)]
                pub unsafe fn $method(&self, $($arg: $ty),*) -> $ret {
                    match self.binding.ensure_loaded() {
                        ::core::result::Result::Ok(table) => unsafe { (table.$method)($($arg),*) },
                        ::core::result::Result::Err(err) => err.code(),
                    }
                }
            )*
        }
    };
}
