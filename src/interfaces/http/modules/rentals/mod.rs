pub mod dto;
pub mod handlers;

pub use dto::{
    ChangeStatusRequest, CreateRentalRequest, EditRentalDatesRequest, RentalDto, RentalStatusDto,
    StatusHistoryDto,
};
pub use handlers::RentalHandlerState;
