pub mod u501_record_payment;
