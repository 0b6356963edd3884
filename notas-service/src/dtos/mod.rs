mod notas;

pub use notas::{
    FaltantesResponse, KpisResponse, ListNotasResponse, PagoRequest, UploadResponse,
};
