pub mod endpoint_binding;
pub mod prescription_api;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use endpoint_binding::EndpointBinding;
pub use prescription_api::PrescriptionApi;
