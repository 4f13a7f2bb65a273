mod test_primitives_basic;
