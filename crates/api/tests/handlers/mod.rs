mod bookings_test;
mod providers_test;
mod symptoms_test;
