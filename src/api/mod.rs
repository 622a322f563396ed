pub mod appwrite;
pub mod qpay;
pub mod queries;
