use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::domain::envelope::{Envelope, ErrorCode, RawEnvelope, ResponseClass};
use crate::domain::errors::BindingError;
use crate::domain::exchange::{Exchange, TransportRequest, Verb};
use crate::domain::navigation::{ErrorContext, Navigation, Outcome};
use crate::domain::operations::EndpointConfig;
use crate::domain::payload::Payload;
use crate::domain::ports::{Navigator, SessionStore, Transport};
use crate::use_cases::session::{end_session, renew_session, request_context};

// One logical operation bound to its endpoint paths. Layers session renewal and
// response-driven navigation over a transport.
#[derive(Clone)]
pub struct EndpointBinding {
    config: EndpointConfig,
    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl EndpointBinding {
    pub fn new(
        config: EndpointConfig,
        transport: Arc<dyn Transport>,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            config,
            transport,
            session,
            navigator,
        }
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    pub async fn read(&self, payload: Option<Payload>) -> Result<Outcome<RawEnvelope>, BindingError> {
        self.call(Verb::Read, payload.unwrap_or_default()).await
    }

    pub async fn create(&self, payload: Payload) -> Result<Outcome<RawEnvelope>, BindingError> {
        self.call(Verb::Create, payload).await
    }

    pub async fn replace(&self, payload: Payload) -> Result<Outcome<RawEnvelope>, BindingError> {
        self.call(Verb::Replace, payload).await
    }

    pub async fn remove(&self, payload: Payload) -> Result<Outcome<RawEnvelope>, BindingError> {
        self.call(Verb::Remove, payload).await
    }

    // Typed read: serialize the request, decode the envelope body.
    // A body that does not match the expected shape is treated like any other
    // unclassified failure: the error view is shown and the caller gets `-2`.
    pub async fn read_as<Req, Res>(
        &self,
        request: &Req,
    ) -> Result<Outcome<Envelope<Res>>, BindingError>
    where
        Req: Serialize,
        Res: DeserializeOwned + Default,
    {
        let payload = to_payload(request)?;
        let outcome = self.call(Verb::Read, payload).await?;
        let raw = match outcome {
            Outcome::Proceed(raw) => raw,
            Outcome::Redirected(navigation) => return Ok(Outcome::Redirected(navigation)),
        };

        match raw.decode::<Res>() {
            Ok(envelope) => Ok(Outcome::Proceed(envelope)),
            Err(err) => {
                tracing::warn!(
                    operation = self.config.name,
                    error = %err,
                    "response body did not match the expected shape"
                );
                self.redirect(Navigation::error_page(ErrorContext::from_status(None)));
                Ok(Outcome::Proceed(Envelope::with_code(ErrorCode::Unknown)))
            }
        }
    }

    #[tracing::instrument(
        name = "endpoint_call",
        skip_all,
        fields(operation = self.config.name, verb = %verb)
    )]
    pub async fn call(
        &self,
        verb: Verb,
        payload: Payload,
    ) -> Result<Outcome<RawEnvelope>, BindingError> {
        let path = self
            .config
            .path_for(verb)
            .ok_or(BindingError::UnsupportedVerb {
                operation: self.config.name,
                verb,
            })?;

        // Credentials are read right before the exchange, never cached.
        let request = TransportRequest {
            verb,
            path: path.to_string(),
            payload,
            context: request_context(self.session.as_ref()),
        };
        let exchange = self.transport.exchange(request).await;

        // Renewal happens for every completed call, failed or not.
        renew_session(self.session.as_ref());

        Ok(self.resolve(exchange))
    }

    fn resolve(&self, exchange: Exchange) -> Outcome<RawEnvelope> {
        let Exchange {
            envelope,
            error_page,
        } = exchange;

        // The transport could not classify the failure: show the error view, but
        // the caller still receives the `-2` envelope untouched.
        if let Some(context) = error_page {
            tracing::warn!(status = %context.code, "unclassified transport failure");
            self.redirect(Navigation::error_page(context));
            return Outcome::Proceed(envelope);
        }

        match envelope.error_code.class() {
            ResponseClass::HardError => {
                tracing::warn!(error_code = %envelope.error_code, "hard error response");
                let context = ErrorContext::new(envelope.error_code.as_str());
                Outcome::Redirected(self.redirect(Navigation::error_page(context)))
            }
            ResponseClass::SessionExpired => {
                tracing::info!(error_code = %envelope.error_code, "session expired, logging out");
                let url = end_session(self.session.as_ref());
                Outcome::Redirected(self.redirect(Navigation::Logout { url }))
            }
            ResponseClass::PassThrough => {
                tracing::debug!(error_code = %envelope.error_code, "response passed through");
                Outcome::Proceed(envelope)
            }
        }
    }

    fn redirect(&self, navigation: Navigation) -> Navigation {
        self.navigator.navigate(&navigation);
        navigation
    }
}

fn to_payload<T: Serialize>(request: &T) -> Result<Payload, BindingError> {
    match serde_json::to_value(request) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(Payload::new()),
        Ok(other) => Err(BindingError::InvalidPayload(format!(
            "expected an object, got {other}"
        ))),
        Err(err) => Err(BindingError::InvalidPayload(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::exchange::RequestContext;
    use crate::domain::ports::Clock;
    use crate::domain::prescriptions::{DcfCodeRequest, DcfCodeResponse};
    use crate::domain::session::{keys, Lifetime};
    use crate::interface_adapters::cookie_jar::CookieJar;
    use crate::use_cases::test_support::{RecordingNavigator, ScriptedTransport, SteppingClock};
    use serde_json::json;
    use time::Duration;
    use time::macros::datetime;

    const LOGOUT: &str = "https://id.example.com/logout?returnTo=https://portal&client_id=x";

    struct Harness {
        binding: EndpointBinding,
        transport: Arc<ScriptedTransport>,
        navigator: Arc<RecordingNavigator>,
        jar: Arc<CookieJar<SteppingClock>>,
        clock: SteppingClock,
    }

    fn harness(config: EndpointConfig) -> Harness {
        let clock = SteppingClock::new(datetime!(2025-02-07 09:00 UTC));
        let jar = Arc::new(CookieJar::new(clock.clone()));
        jar.set(keys::AUTH_TOKEN, "auth-1", Lifetime::Long);
        jar.set(keys::XSRF_TOKEN, "xsrf-1", Lifetime::Long);
        jar.set(keys::HONBU_FLAG, "0", Lifetime::Short);
        jar.set(keys::LOGOUT_URL, LOGOUT, Lifetime::Long);
        let transport = Arc::new(ScriptedTransport::new());
        let navigator = Arc::new(RecordingNavigator::default());
        let binding = EndpointBinding::new(
            config,
            transport.clone(),
            jar.clone(),
            navigator.clone(),
        );
        Harness {
            binding,
            transport,
            navigator,
            jar,
            clock,
        }
    }

    fn read_only() -> EndpointConfig {
        EndpointConfig::read_only("dcf_code", "/mr/dcf_code")
    }

    fn envelope(code: &str, body: Value) -> RawEnvelope {
        let mut raw = RawEnvelope::with_code(ErrorCode::parse(code));
        raw.body = body.as_object().cloned().unwrap_or_default();
        raw
    }

    #[tokio::test]
    async fn when_code_is_hard_error_then_binding_redirects_to_error_view() {
        for code in ["400", "403", "500"] {
            let h = harness(read_only());
            h.transport.push(Exchange::delivered(envelope(code, json!({}))));

            let outcome = h.binding.read(None).await.expect("expected call to dispatch");

            let expected = Navigation::ErrorPage(ErrorContext::new(code));
            assert_eq!(outcome, Outcome::Redirected(expected.clone()));
            assert_eq!(h.navigator.recorded(), vec![expected]);
            // Hard errors keep the session.
            assert_eq!(h.jar.get(keys::AUTH_TOKEN), "auth-1");
        }
    }

    #[tokio::test]
    async fn when_code_is_session_expired_then_session_is_cleared_and_logout_follows() {
        for code in ["302", "401"] {
            let h = harness(read_only());
            h.jar.set("unrelated_pref", "on", Lifetime::Month);
            h.transport.push(Exchange::delivered(envelope(code, json!({}))));

            let outcome = h.binding.read(None).await.expect("expected call to dispatch");

            let expected = Navigation::Logout {
                url: LOGOUT.to_string(),
            };
            assert_eq!(outcome, Outcome::Redirected(expected.clone()));
            assert_eq!(h.navigator.recorded(), vec![expected]);
            assert!(h.jar.keys().is_empty());
        }
    }

    #[tokio::test]
    async fn when_code_is_outside_both_sets_then_envelope_passes_through_unchanged() {
        for code in ["200", "404", "409", "503", "-1", "-2", "-3", "418"] {
            let h = harness(read_only());
            let mut produced = envelope(code, json!({"dcf_cod": ["1111111"]}));
            produced.error_message = "message".to_string();
            produced.error_level = "warn".to_string();
            h.transport.push(Exchange::delivered(produced.clone()));

            let outcome = h.binding.read(None).await.expect("expected call to dispatch");

            assert_eq!(outcome, Outcome::Proceed(produced));
            assert!(h.navigator.recorded().is_empty());
        }
    }

    #[tokio::test]
    async fn when_transport_reports_unclassified_failure_then_error_view_gets_its_status() {
        let h = harness(read_only());
        h.transport.push(Exchange::failed(Some(418)));

        let outcome = h.binding.read(None).await.expect("expected call to dispatch");

        assert_eq!(
            h.navigator.recorded(),
            vec![Navigation::ErrorPage(ErrorContext::new("418"))]
        );
        // The caller still gets exactly what the transport produced.
        assert_eq!(
            outcome,
            Outcome::Proceed(RawEnvelope::with_code(ErrorCode::Unknown))
        );
    }

    #[tokio::test]
    async fn when_transport_fails_without_status_then_error_view_gets_sentinel_and_caller_minus_two() {
        let h = harness(read_only());
        h.transport.push(Exchange::failed(None));

        let outcome = h.binding.read(None).await.expect("expected call to dispatch");

        assert_eq!(
            h.navigator.recorded(),
            vec![Navigation::ErrorPage(ErrorContext::new("999"))]
        );
        let envelope = outcome.proceed().expect("expected envelope for the caller");
        assert_eq!(envelope.error_code.as_str(), "-2");
        assert!(envelope.body.is_empty());
    }

    #[tokio::test]
    async fn when_transport_times_out_then_caller_gets_minus_one_without_navigation() {
        let h = harness(read_only());
        h.transport.push(Exchange::timed_out());

        let outcome = h.binding.read(None).await.expect("expected call to dispatch");

        let envelope = outcome.proceed().expect("expected pass-through");
        assert_eq!(envelope.error_code, ErrorCode::Timeout);
        assert!(h.navigator.recorded().is_empty());
    }

    #[tokio::test]
    async fn when_calling_then_request_carries_path_payload_and_fresh_credentials() {
        let h = harness(read_only());
        h.transport.push(Exchange::delivered(envelope("200", json!({}))));
        h.transport.push(Exchange::delivered(envelope("200", json!({}))));
        let payload = json!({"kkk_cod": "111111"}).as_object().cloned().unwrap_or_default();

        h.binding.read(Some(payload.clone())).await.expect("expected call to dispatch");
        h.jar.set(keys::AUTH_TOKEN, "auth-2", Lifetime::Long);
        h.binding.read(None).await.expect("expected call to dispatch");

        let requests = h.transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].verb, Verb::Read);
        assert_eq!(requests[0].path, "/mr/dcf_code");
        assert_eq!(requests[0].payload, payload);
        assert_eq!(requests[0].context.auth_token, "auth-1");
        assert_eq!(requests[0].context.xsrf_token, "xsrf-1");
        assert_eq!(requests[1].context.auth_token, "auth-2");
        assert!(requests[1].payload.is_empty());
    }

    #[tokio::test]
    async fn when_auth_token_is_missing_then_call_still_goes_out_with_empty_token() {
        let h = harness(read_only());
        h.jar.delete_all();
        h.transport.push(Exchange::delivered(envelope("401", json!({}))));

        let outcome = h.binding.read(None).await.expect("expected call to dispatch");

        assert_eq!(h.transport.requests()[0].context, RequestContext::default());
        assert_eq!(
            outcome,
            Outcome::Redirected(Navigation::Logout { url: String::new() })
        );
    }

    #[tokio::test]
    async fn when_two_calls_succeed_then_each_restarts_session_expiry() {
        let h = harness(read_only());
        h.transport.push(Exchange::delivered(envelope("200", json!({}))));
        h.transport.push(Exchange::delivered(envelope("200", json!({}))));

        h.clock.advance(Duration::minutes(10));
        h.binding.read(None).await.expect("expected call to dispatch");
        let first = h.jar.expires_at(keys::HONBU_FLAG);

        h.clock.advance(Duration::minutes(15));
        h.binding.read(None).await.expect("expected call to dispatch");
        let second = h.jar.expires_at(keys::HONBU_FLAG);

        assert_eq!(first, Some(h.clock.now() - Duration::minutes(15) + Duration::minutes(31)));
        assert_eq!(second, Some(h.clock.now() + Duration::minutes(31)));
        assert_eq!(
            h.jar.expires_at(keys::LOGOUT_URL),
            Some(h.clock.now() + Duration::days(1))
        );
    }

    #[tokio::test]
    async fn when_call_fails_then_session_is_still_renewed() {
        let h = harness(read_only());
        h.transport.push(Exchange::network_down());

        h.clock.advance(Duration::minutes(20));
        h.binding.read(None).await.expect("expected call to dispatch");

        assert_eq!(
            h.jar.expires_at(keys::HONBU_FLAG),
            Some(h.clock.now() + Duration::minutes(31))
        );
    }

    #[tokio::test]
    async fn when_verb_has_no_path_then_call_is_rejected_without_exchange() {
        let h = harness(read_only());

        let result = h.binding.create(Payload::new()).await;

        assert!(matches!(
            result,
            Err(BindingError::UnsupportedVerb {
                operation: "dcf_code",
                verb: Verb::Create
            })
        ));
        assert!(h.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn when_all_verbs_are_configured_then_each_uses_its_own_path() {
        let h = harness(EndpointConfig {
            name: "records",
            read_path: Some("/records/read"),
            create_path: Some("/records/create"),
            replace_path: Some("/records/replace"),
            remove_path: Some("/records/remove"),
        });
        for _ in 0..4 {
            h.transport.push(Exchange::delivered(envelope("200", json!({}))));
        }

        h.binding.read(None).await.expect("read");
        h.binding.create(Payload::new()).await.expect("create");
        h.binding.replace(Payload::new()).await.expect("replace");
        h.binding.remove(Payload::new()).await.expect("remove");

        let calls: Vec<_> = h
            .transport
            .requests()
            .into_iter()
            .map(|request| (request.verb, request.path))
            .collect();
        assert_eq!(
            calls,
            vec![
                (Verb::Read, "/records/read".to_string()),
                (Verb::Create, "/records/create".to_string()),
                (Verb::Replace, "/records/replace".to_string()),
                (Verb::Remove, "/records/remove".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn when_reading_typed_then_request_is_serialized_and_body_decoded() {
        let h = harness(read_only());
        h.transport.push(Exchange::delivered(envelope(
            "200",
            json!({"dcf_cod": ["1111111", "2222222"]}),
        )));

        let outcome = h
            .binding
            .read_as::<_, DcfCodeResponse>(&DcfCodeRequest {
                kkk_cod: "111111".to_string(),
            })
            .await
            .expect("expected call to dispatch");

        let envelope = outcome.proceed().expect("expected pass-through");
        assert_eq!(envelope.body.dcf_cod, vec!["1111111", "2222222"]);
        assert_eq!(h.transport.requests()[0].payload["kkk_cod"], json!("111111"));
    }

    #[tokio::test]
    async fn when_typed_body_does_not_match_then_error_view_gets_sentinel() {
        let h = harness(read_only());
        h.transport.push(Exchange::delivered(envelope(
            "200",
            json!({"dcf_cod": "not-a-list"}),
        )));

        let outcome = h
            .binding
            .read_as::<_, DcfCodeResponse>(&DcfCodeRequest::default())
            .await
            .expect("expected call to dispatch");

        assert_eq!(
            h.navigator.recorded(),
            vec![Navigation::ErrorPage(ErrorContext::new("999"))]
        );
        let envelope = outcome.proceed().expect("expected envelope for the caller");
        assert_eq!(envelope.error_code, ErrorCode::Unknown);
        assert!(envelope.body.dcf_cod.is_empty());
    }

    #[tokio::test]
    async fn when_typed_request_is_not_an_object_then_payload_is_rejected() {
        let h = harness(read_only());

        let result = h.binding.read_as::<_, DcfCodeResponse>(&vec![1, 2]).await;

        assert!(matches!(result, Err(BindingError::InvalidPayload(_))));
        assert!(h.transport.requests().is_empty());
    }
}
