use super::request_reader::Request;
use super::response_writer::Response;
use crate::application::{MandateTerms, UpiService};
use crate::error::Result;
use serde_json::json;
use tracing::warn;

pub const SERVICE_NAME: &str = "upi-service";

/// Runs one request against the service and wraps the outcome.
///
/// Every failure becomes a failure envelope carrying the error kind.
pub async fn handle(service: &UpiService, request: Request) -> Response {
    match dispatch(service, request).await {
        Ok(response) => response,
        Err(e) => {
            warn!(code = e.code(), error = %e, "request rejected");
            Response::failed(&e)
        }
    }
}

async fn dispatch(service: &UpiService, request: Request) -> Result<Response> {
    match request {
        Request::Health => Response::ok(&json!({ "status": "ok", "service": SERVICE_NAME })),
        Request::CreateVpa {
            user_id,
            prefix,
            account_id,
        } => Response::ok(&service.create_vpa(&user_id, &prefix, &account_id).await?),
        Request::ListVpas { user_id } => Response::ok(&service.list_vpas(&user_id).await?),
        Request::ValidateVpa { vpa } => Response::ok(&service.validate_vpa(&vpa).await?),
        Request::DeactivateVpa { user_id, vpa } => {
            Response::ok(&service.deactivate_vpa(&user_id, &vpa).await?)
        }
        Request::Pay {
            user_id,
            to_vpa,
            amount,
            note,
        } => Response::ok(&service.pay(&user_id, &to_vpa, amount, &note).await?),
        Request::Collect {
            user_id,
            from_vpa,
            amount,
            note,
        } => Response::ok(&service.collect(&user_id, &from_vpa, amount, &note).await?),
        Request::ListCollectRequests { user_id } => {
            Response::ok(&service.list_collect_requests(&user_id).await?)
        }
        Request::ListTransactions {
            user_id,
            page,
            limit,
        } => Response::ok(&service.transaction_history(&user_id, page, limit).await?),
        Request::CreateMandate {
            user_id,
            payee_vpa,
            amount,
            frequency,
            start_date,
            end_date,
            purpose,
        } => {
            let terms = MandateTerms {
                payee_address: payee_vpa,
                amount,
                frequency: frequency.into(),
                start_date,
                end_date,
                purpose,
            };
            Response::ok(&service.create_mandate(&user_id, terms).await?)
        }
        Request::ListMandates { user_id } => Response::ok(&service.list_mandates(&user_id).await?),
    }
}
