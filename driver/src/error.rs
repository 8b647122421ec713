use kernel::KernelError;

/// Translates a backend error into a [`KernelError`] report, choosing the variant by error kind.
pub trait ConvertError: Sized {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}
