use std::collections::HashMap;

use crate::domain::envelope::Envelope;
use crate::domain::errors::BindingError;
use crate::domain::navigation::Outcome;
use crate::domain::operations::Operation;
use crate::domain::prescriptions::{
    DcfCodeRequest, DcfCodeResponse, PrescriptionDispRequest, PrescriptionDispResponse,
    PrescriptionListSearchRequest, PrescriptionListSearchResponse, ProjectNamesRequest,
    ProjectNamesResponse, SystemSettingsRequest, SystemSettingsResponse,
};
use crate::use_cases::endpoint_binding::EndpointBinding;

// Typed entry point used by the list and detail views. Every method is the read
// verb of one endpoint binding.
#[derive(Clone, Default)]
pub struct PrescriptionApi {
    bindings: HashMap<Operation, EndpointBinding>,
}

pub type ApiResult<T> = Result<Outcome<Envelope<T>>, BindingError>;

impl PrescriptionApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binding(mut self, operation: Operation, binding: EndpointBinding) -> Self {
        self.bindings.insert(operation, binding);
        self
    }

    pub fn binding(&self, operation: Operation) -> Result<&EndpointBinding, BindingError> {
        self.bindings
            .get(&operation)
            .ok_or_else(|| BindingError::UnknownOperation(operation.name().to_string()))
    }

    pub fn binding_by_name(&self, name: &str) -> Result<&EndpointBinding, BindingError> {
        let operation = Operation::from_name(name)
            .ok_or_else(|| BindingError::UnknownOperation(name.to_string()))?;
        self.binding(operation)
    }

    pub async fn dcf_codes(&self, request: &DcfCodeRequest) -> ApiResult<DcfCodeResponse> {
        self.binding(Operation::DcfCode)?.read_as(request).await
    }

    pub async fn prescription_detail(
        &self,
        request: &PrescriptionDispRequest,
    ) -> ApiResult<PrescriptionDispResponse> {
        self.binding(Operation::PrescriptionDisp)?
            .read_as(request)
            .await
    }

    pub async fn search_prescriptions(
        &self,
        request: &PrescriptionListSearchRequest,
    ) -> ApiResult<PrescriptionListSearchResponse> {
        self.binding(Operation::PrescriptionListSearch)?
            .read_as(request)
            .await
    }

    pub async fn project_names(
        &self,
        request: &ProjectNamesRequest,
    ) -> ApiResult<ProjectNamesResponse> {
        self.binding(Operation::ProjectNames)?.read_as(request).await
    }

    pub async fn system_settings(&self) -> ApiResult<SystemSettingsResponse> {
        self.binding(Operation::SystemSettings)?
            .read_as(&SystemSettingsRequest {})
            .await
    }
}
