pub mod toyyibpay_client;
